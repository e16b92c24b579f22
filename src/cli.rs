use crate::{
    client::Filters,
    config::{ClientConfig, ServerConfig},
};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Options parsed from command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "events-log-viewer",
    version,
    about = "Serve and query a filtered view of an event log"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),

    /// Query a running server and print the matching events
    Query(QueryArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve(ServeArgs::default())
    }
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on (overrides EVENTS_LOG_BIND)
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Event log file (overrides EVENTS_LOG_FILE)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl ServeArgs {
    pub fn apply(self, config: &mut ServerConfig) {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(file) = self.file {
            config.log_file = file;
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Only events at or after this date
    #[arg(long, default_value = "")]
    pub from_date: String,

    /// Only events at or before this date
    #[arg(long, default_value = "")]
    pub to_date: String,

    /// Only events of exactly this type
    #[arg(long, default_value = "")]
    pub event_type: String,

    /// Only events from this user
    #[arg(long, default_value = "")]
    pub user_id: String,

    /// Server base URL (overrides EVENTS_LOG_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,
}

impl QueryArgs {
    pub fn filters(&self) -> Filters {
        Filters {
            from_date: self.from_date.clone(),
            to_date: self.to_date.clone(),
            event_type: self.event_type.clone(),
            user_id: self.user_id.clone(),
        }
    }

    pub fn api_url<'a>(&'a self, config: &'a ClientConfig) -> &'a str {
        self.api_url.as_deref().unwrap_or(&config.api_url)
    }
}
