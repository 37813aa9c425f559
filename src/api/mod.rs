//! HTTP surface of the scoring service

pub mod error;
pub mod handlers;

use crate::config::ServerConfig;
use crate::models::inference::InferenceEngine;
use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when the artifacts were not found at startup
    pub engine: Option<Arc<InferenceEngine>>,
}

impl AppState {
    pub fn new(engine: Option<InferenceEngine>) -> Self {
        Self {
            engine: engine.map(Arc::new),
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.engine.is_some()
    }
}

/// Routes without middleware; used directly by tests.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .with_state(state)
}

/// Create the main router with CORS and request tracing.
pub fn create_router(state: AppState, server: &ServerConfig) -> Result<Router> {
    Ok(routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origins)?))
}

/// CORS for the configured origins. A `*` entry allows any origin without
/// credentials; otherwise credentials are allowed for the listed origins.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(AllowOrigin::any()));
    }

    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{}'", o))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_origins() {
        assert!(cors_layer(&["http://localhost:3000".to_string()]).is_ok());
        assert!(cors_layer(&["*".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }

    #[test]
    fn test_state_without_engine() {
        let state = AppState::new(None);
        assert!(!state.model_loaded());
    }
}
