//! Error handling for the HTTP boundary

use crate::models::inference::ScoringError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Requests rejected before they reach the scorer
#[derive(Debug, Error)]
pub enum AppError {
    /// Well-formed JSON that does not match the transaction schema
    #[error("{0}")]
    InvalidPayload(String),

    /// Body is not valid JSON or could not be read
    #[error("{0}")]
    MalformedRequest(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Schema-valid transaction the classifier cannot score
    #[error(transparent)]
    Unscorable(#[from] ScoringError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(_) | AppError::Unscorable(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => AppError::InvalidPayload(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => {
                AppError::UnsupportedMediaType(e.body_text())
            }
            other => AppError::MalformedRequest(other.body_text()),
        }
    }
}
