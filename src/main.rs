//! taskhub-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use taskhub_gateway::app_state::AppState;
use taskhub_gateway::config::{GatewayConfig, LogFormat};
use taskhub_gateway::domain::ConnectionRegistry;
use taskhub_gateway::server::{build_router, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("invalid gateway configuration")?;

    // Initialize tracing
    init_tracing(&config);
    tracing::info!(addr = %config.listen_addr, "starting taskhub-gateway");

    // One registry per process, shared by every consumer
    let registry = Arc::new(ConnectionRegistry::with_write_timeout(
        config.ws_write_timeout,
    ));
    let app_state = AppState::new(registry);
    let app = build_router(app_state, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing(config: &GatewayConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
