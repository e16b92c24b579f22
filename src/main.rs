use anyhow::Result;
use clap::Parser;
use events_log_viewer::{
    Cli, Config,
    cli::Command,
    client,
    run,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    init_tracing(&config.log.rust_log);

    match cli.command.unwrap_or_default() {
        Command::Serve(args) => {
            args.apply(&mut config.server);
            tracing::info!(
                "Starting events log viewer for {}",
                config.server.log_file.display()
            );
            run::run_http_server(&config.server).await
        }
        Command::Query(args) => {
            let api_url = args.api_url(&config.client).to_string();
            client::run_query(&api_url, args.filters()).await
        }
    }
}

fn init_tracing(rust_log: &str) {
    let env_filter = EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
