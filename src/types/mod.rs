//! Type definitions for fraud scoring

pub mod prediction;
pub mod transaction;

pub use prediction::{FraudPrediction, PredictResponse, Prediction};
pub use transaction::{LabeledTransaction, TransactionRecord};
