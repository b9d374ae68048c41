use std::net::SocketAddr;
use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing::{error, info};

use retail_api_gate::{AppState, Config, LogFormat, build_router, metrics, utils};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exitcode::OK as u8),
        Err(exit_code) => ExitCode::from(exit_code as u8),
    }
}

/// Run the application, returning an exit code on error.
async fn run() -> Result<(), exitcode::ExitCode> {
    let config = Config::from_env().map_err(|e| {
        utils::init_tracing("info", LogFormat::Pretty);
        error!("Configuration error: {e}");
        exitcode::CONFIG
    })?;
    utils::init_tracing(&config.log_level, config.log_format);

    info!(
        "Starting Retail API Gate v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        host = %config.host,
        port = %config.port,
        api_key_configured = config.api_key.is_configured(),
        log_format = %config.log_format,
        "Configuration loaded"
    );

    if let Some(metrics_addr) = config.metrics_addr() {
        metrics::try_init_metrics(metrics_addr);
    }

    let state = AppState::new(config.clone());
    let app = build_router(state);

    let addr: SocketAddr = config.server_addr().parse().map_err(|e| {
        error!("Invalid server address: {e}");
        exitcode::CONFIG
    })?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind to {addr}: {e}");
        exitcode::UNAVAILABLE
    })?;

    info!("Server listening on http://{addr}");
    info!("  GET  /health      - Health check (no API key)");
    info!("  GET  /api/status  - Service status (requires X-API-Key)");

    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {e}");
            exitcode::SOFTWARE
        })?;

    info!("Server shutdown complete");
    Ok(())
}
