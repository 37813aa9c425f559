//! Credit Card Fraud Scoring Library
//!
//! Fits a logistic-regression fraud classifier offline and serves it over
//! HTTP. Training and serving share one feature extraction path, and the
//! classifier artifact records the column order it was fit on so the
//! service can verify it at load time.

pub mod api;
pub mod config;
pub mod dataset;
pub mod evaluation;
pub mod feature_extractor;
pub mod logging;
pub mod models;
pub mod trainer;
pub mod types;

pub use api::{create_router, AppState};
pub use config::AppConfig;
pub use dataset::Dataset;
pub use feature_extractor::FeatureExtractor;
pub use models::inference::InferenceEngine;
pub use types::{prediction::FraudPrediction, transaction::TransactionRecord};
