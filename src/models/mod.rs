//! Model fitting, persistence and inference components

pub mod artifacts;
pub mod inference;
pub mod logistic;
pub mod scaler;

pub use artifacts::{ArtifactError, ArtifactStore};
pub use inference::{InferenceEngine, ScoringError};
pub use logistic::{LogisticParams, LogisticRegression};
pub use scaler::{ScalerArtifact, StandardScaler};
