//! Inference engine for fraud scoring

use crate::config::ArtifactsConfig;
use crate::feature_extractor::{FeatureExtractor, FeatureLayout, FeatureSchemaError};
use crate::models::artifacts::{ArtifactError, ArtifactStore};
use crate::models::logistic::LogisticRegression;
use crate::models::scaler::ScalerArtifact;
use crate::types::prediction::{FraudPrediction, Prediction};
use crate::types::transaction::TransactionRecord;
use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A transaction the classifier cannot produce a probability for
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    /// Feature terms overflowed to opposite infinities
    #[error("transaction values are too large to score")]
    NonFiniteScore,
}

/// Immutable scoring context built once from the fitted artifacts.
///
/// Holds the classifier, the scaler and the column mapping between them.
/// Nothing here is mutated after construction, so one engine can be shared
/// across request handlers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    classifier: LogisticRegression,
    extractor: FeatureExtractor,
    layout: FeatureLayout,
}

impl InferenceEngine {
    /// Create an engine, verifying the classifier's recorded feature schema.
    pub fn new(
        classifier: LogisticRegression,
        scaler: ScalerArtifact,
    ) -> Result<Self, ArtifactError> {
        if classifier.coefficients.len() != classifier.feature_names.len() {
            return Err(FeatureSchemaError::CoefficientCount {
                names: classifier.feature_names.len(),
                coefficients: classifier.coefficients.len(),
            }
            .into());
        }
        let layout = FeatureLayout::for_model(&classifier.feature_names)?;
        if !layout.is_identity() {
            debug!("Classifier feature order differs from canonical order; columns will be re-arranged");
        }

        Ok(Self {
            classifier,
            extractor: FeatureExtractor::new(scaler),
            layout,
        })
    }

    /// Load both artifacts from the configured paths.
    ///
    /// Returns `Ok(None)` when either file is missing; the service then runs
    /// without a model. Artifacts that exist but cannot be read or do not
    /// match the feature schema are an error.
    pub fn load(config: &ArtifactsConfig) -> Result<Option<Self>> {
        let store = ArtifactStore::from_config(config);

        let missing = store.missing();
        if !missing.is_empty() {
            for path in &missing {
                warn!(path = %path.display(), "Model artifact not found");
            }
            warn!("Prediction endpoint will not work until the model is trained (run `train-model`)");
            return Ok(None);
        }

        let classifier = store
            .load_classifier()
            .context("Failed to load classifier artifact")?;
        let scaler = store.load_scaler().context("Failed to load scaler artifact")?;
        let engine = Self::new(classifier, scaler)
            .context("Classifier artifact is incompatible with this service")?;

        info!(
            model = %store.model_path().display(),
            scaler = %store.scaler_path().display(),
            features = engine.classifier.n_features(),
            trained_at = %engine.classifier.trained_at,
            "Model and scaler loaded successfully"
        );

        Ok(Some(engine))
    }

    /// Feature vector in the exact order the classifier was fit on.
    pub fn features(&self, tx: &TransactionRecord) -> Vec<f64> {
        self.layout.arrange(&self.extractor.extract(tx))
    }

    /// Classify a single transaction.
    pub fn predict(&self, tx: &TransactionRecord) -> Result<Prediction, ScoringError> {
        let features = self.features(tx);
        let prediction = self.classifier.predict(&features);
        if prediction.probability.is_nan() {
            return Err(ScoringError::NonFiniteScore);
        }

        debug!(
            is_fraud = prediction.label,
            probability = prediction.probability,
            "Transaction scored"
        );

        Ok(prediction)
    }

    /// Classify a single transaction and format the result for API clients.
    pub fn score(&self, tx: &TransactionRecord) -> Result<FraudPrediction, ScoringError> {
        self.predict(tx).map(FraudPrediction::from)
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    pub fn scaler(&self) -> &ScalerArtifact {
        self.extractor.scaler()
    }
}
