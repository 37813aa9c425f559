//! Health and scoring handlers

use super::error::AppResult;
use super::AppState;
use crate::types::prediction::PredictResponse;
use crate::types::transaction::TransactionRecord;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub model_loaded: bool,
}

/// Liveness check
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Credit Card Fraud Detection API is running.".to_string(),
        model_loaded: state.model_loaded(),
    })
}

/// Score one transaction.
///
/// Body validation happens in the `Json` extractor; a payload missing any of
/// the 30 fields never reaches the engine.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<TransactionRecord>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(transaction) = payload?;

    let Some(engine) = state.engine.as_deref() else {
        return Ok(Json(PredictResponse::model_not_loaded()));
    };

    let start = Instant::now();
    let result = engine.score(&transaction)?;
    debug!(
        is_fraud = result.is_fraud,
        fraud_probability = %result.fraud_probability,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Prediction served"
    );

    Ok(Json(PredictResponse::Scored(result)))
}
