//! Credit Card Fraud Scoring - HTTP entry point
//!
//! Loads the fitted classifier and scaler once, then serves `/predict`.
//! Without artifacts the server still starts and answers every prediction
//! with a "model not loaded" error.

use anyhow::{Context, Result};
use card_fraud_scoring::{
    api::{create_router, AppState},
    config::AppConfig,
    logging::init_logging,
    models::inference::InferenceEngine,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Credit Card Fraud Detection API");

    // Artifacts are loaded exactly once and shared read-only afterwards
    let engine = InferenceEngine::load(&config.artifacts)?;
    let state = AppState::new(engine);
    if !state.model_loaded() {
        warn!("No model loaded; /predict will return an error until artifacts are trained");
    }

    let app = create_router(state, &config.server)?;

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, cors_origins = ?config.server.cors_origins, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
