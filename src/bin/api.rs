use anyhow::Result;
use std::net::SocketAddr;
use tracing::{info, warn};

use seolens::{api, app_state::AppState, config::Config, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env()?;
    info!(?config, "Loaded configuration");
    if !config.has_llm_api_key() {
        warn!("OPENAI_API_KEY is not set; LLM requests will be sent without credentials");
    }

    let state = AppState::from_config(&config)?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, draining connections...");
}
