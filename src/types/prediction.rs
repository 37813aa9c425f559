//! Scoring response structures

use serde::{Deserialize, Serialize};

/// Human readable label for a positive prediction.
pub const FRAUDULENT: &str = "Fraudulent";
/// Human readable label for a negative prediction.
pub const NOT_FRAUDULENT: &str = "Not Fraudulent";
/// Message returned by the predict endpoint when no model is loaded.
pub const MODEL_NOT_LOADED: &str = "Model not loaded. Please train the model first.";

/// Raw classifier output for one transaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class (0 or 1)
    pub label: u8,
    /// Positive-class probability (0.0 - 1.0)
    pub probability: f64,
}

impl Prediction {
    pub fn is_fraud(&self) -> bool {
        self.label == 1
    }
}

/// Scoring result as returned to API clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudPrediction {
    /// 1 when the transaction is classified as fraudulent, else 0
    pub is_fraud: u8,
    /// Positive-class probability as a percentage string, e.g. `"3.17%"`
    pub fraud_probability: String,
    /// `"Fraudulent"` or `"Not Fraudulent"`
    pub prediction: String,
}

impl From<Prediction> for FraudPrediction {
    fn from(p: Prediction) -> Self {
        let label = if p.is_fraud() { FRAUDULENT } else { NOT_FRAUDULENT };
        Self {
            is_fraud: p.label,
            fraud_probability: format_percentage(p.probability),
            prediction: label.to_string(),
        }
    }
}

/// Body of the predict endpoint.
///
/// Untagged so the JSON carries either the three prediction keys or a single
/// `error` key, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Scored(FraudPrediction),
    Unavailable { error: String },
}

impl PredictResponse {
    pub fn model_not_loaded() -> Self {
        PredictResponse::Unavailable {
            error: MODEL_NOT_LOADED.to_string(),
        }
    }
}

/// Format a probability in [0, 1] as a percentage with two decimals.
pub fn format_percentage(probability: f64) -> String {
    format!("{:.2}%", probability.clamp(0.0, 1.0) * 100.0)
}
