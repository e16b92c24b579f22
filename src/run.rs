use crate::{
    config::ServerConfig,
    server::{AppState, EVENTS_LOG_ROUTE, build_router},
};
use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

pub async fn run_http_server(config: &ServerConfig) -> Result<()> {
    tracing::info!("Initializing HTTP server on {}", config.bind);

    let router = build_router(
        AppState::from_config(config),
        config.allowed_origin_header()?,
    );
    let tcp_listener = TcpListener::bind(config.bind).await?;

    tracing::info!(
        "Server started successfully at http://{}{EVENTS_LOG_ROUTE}",
        tcp_listener.local_addr()?
    );

    serve(tcp_listener, router).await
}

/// Serve `router` on an already bound listener until Ctrl+C.
pub async fn serve(tcp_listener: TcpListener, router: Router) -> Result<()> {
    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Received shutdown signal"),
                Err(e) => tracing::error!("Unable to listen for shutdown signal: {e}"),
            }
        })
        .await?;

    tracing::info!("Server shutting down");
    Ok(())
}
