//! Feature extraction for fraud model training and inference.
//!
//! Training and serving both build feature vectors through
//! [`FeatureExtractor`], so the scaled columns are computed the same way on
//! both sides. [`FeatureLayout`] then maps the canonical column order onto
//! whatever order a fitted classifier recorded.

use crate::models::scaler::ScalerArtifact;
use crate::types::transaction::{TransactionRecord, PCA_COMPONENTS};
use std::collections::HashMap;
use thiserror::Error;

/// Number of model input features.
pub const FEATURE_COUNT: usize = PCA_COMPONENTS + 2;

/// Canonical training column order: `V1..V28`, then the two scaled columns.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "V1",
    "V2",
    "V3",
    "V4",
    "V5",
    "V6",
    "V7",
    "V8",
    "V9",
    "V10",
    "V11",
    "V12",
    "V13",
    "V14",
    "V15",
    "V16",
    "V17",
    "V18",
    "V19",
    "V20",
    "V21",
    "V22",
    "V23",
    "V24",
    "V25",
    "V26",
    "V27",
    "V28",
    "scaled_amount",
    "scaled_time",
];

/// Canonical feature names as owned strings, for recording in a classifier.
pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Transforms transactions into canonical-order feature vectors.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    scaler: ScalerArtifact,
}

impl FeatureExtractor {
    pub fn new(scaler: ScalerArtifact) -> Self {
        Self { scaler }
    }

    /// Extract features from a transaction in [`FEATURE_NAMES`] order.
    ///
    /// Raw Time and Amount are replaced by their standardized values.
    pub fn extract(&self, tx: &TransactionRecord) -> [f64; FEATURE_COUNT] {
        let mut features = [0.0; FEATURE_COUNT];
        features[..PCA_COMPONENTS].copy_from_slice(&tx.components());
        features[PCA_COMPONENTS] = self.scaler.scale_amount(tx.amount);
        features[PCA_COMPONENTS + 1] = self.scaler.scale_time(tx.time);
        features
    }

    pub fn scaler(&self) -> &ScalerArtifact {
        &self.scaler
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FeatureSchemaError {
    #[error("classifier expects {found} features, service produces {expected}")]
    Length { expected: usize, found: usize },

    #[error("classifier expects unknown feature '{0}'")]
    Unknown(String),

    #[error("classifier lists feature '{0}' more than once")]
    Duplicate(String),

    #[error("classifier has {coefficients} coefficients for {names} feature names")]
    CoefficientCount { names: usize, coefficients: usize },
}

/// Column mapping from the canonical order to a classifier's stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayout {
    /// `order[i]` is the canonical index of the classifier's i-th feature
    order: Vec<usize>,
}

impl FeatureLayout {
    /// Build the mapping for a classifier's recorded feature names.
    ///
    /// The names must be a permutation of [`FEATURE_NAMES`].
    pub fn for_model(model_features: &[String]) -> Result<Self, FeatureSchemaError> {
        if model_features.len() != FEATURE_COUNT {
            return Err(FeatureSchemaError::Length {
                expected: FEATURE_COUNT,
                found: model_features.len(),
            });
        }

        let canonical: HashMap<&str, usize> = FEATURE_NAMES
            .iter()
            .enumerate()
            .map(|(i, &name)| (name, i))
            .collect();

        let mut seen = [false; FEATURE_COUNT];
        let mut order = Vec::with_capacity(FEATURE_COUNT);
        for name in model_features {
            let idx = *canonical
                .get(name.as_str())
                .ok_or_else(|| FeatureSchemaError::Unknown(name.clone()))?;
            if seen[idx] {
                return Err(FeatureSchemaError::Duplicate(name.clone()));
            }
            seen[idx] = true;
            order.push(idx);
        }

        Ok(Self { order })
    }

    /// Re-arrange a canonical feature vector into the classifier's order.
    pub fn arrange(&self, canonical: &[f64; FEATURE_COUNT]) -> Vec<f64> {
        self.order.iter().map(|&i| canonical[i]).collect()
    }

    /// True when the classifier uses the canonical order unchanged.
    pub fn is_identity(&self) -> bool {
        self.order.iter().enumerate().all(|(i, &j)| i == j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scaler::StandardScaler;

    fn scaler() -> ScalerArtifact {
        ScalerArtifact {
            amount: StandardScaler {
                mean: 100.0,
                variance: 2500.0,
                scale: 50.0,
                n_samples: 10,
            },
            time: StandardScaler {
                mean: 1000.0,
                variance: 250_000.0,
                scale: 500.0,
                n_samples: 10,
            },
        }
    }

    fn sample_tx() -> TransactionRecord {
        let mut components = [0.0; PCA_COMPONENTS];
        for (i, c) in components.iter_mut().enumerate() {
            *c = (i + 1) as f64 / 10.0;
        }
        TransactionRecord::new(1500.0, components, 150.0)
    }

    #[test]
    fn test_feature_extraction() {
        let extractor = FeatureExtractor::new(scaler());
        let features = extractor.extract(&sample_tx());

        assert_eq!(features.len(), FEATURE_COUNT);
        assert_eq!(features[0], 0.1); // V1
        assert_eq!(features[27], 2.8); // V28
        assert_eq!(features[28], 1.0); // scaled_amount
        assert_eq!(features[29], 1.0); // scaled_time
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = FeatureExtractor::new(scaler());
        let tx = sample_tx();
        assert_eq!(extractor.extract(&tx), extractor.extract(&tx));
    }

    #[test]
    fn test_feature_names() {
        assert_eq!(FEATURE_NAMES.len(), 30);
        assert_eq!(FEATURE_NAMES[0], "V1");
        assert_eq!(FEATURE_NAMES[28], "scaled_amount");
        assert_eq!(FEATURE_NAMES[29], "scaled_time");
    }

    #[test]
    fn test_identity_layout() {
        let layout = FeatureLayout::for_model(&feature_names()).unwrap();
        assert!(layout.is_identity());

        let features = FeatureExtractor::new(scaler()).extract(&sample_tx());
        assert_eq!(layout.arrange(&features), features.to_vec());
    }

    #[test]
    fn test_permuted_layout() {
        let mut names = feature_names();
        names.rotate_left(2); // V3 .. scaled_time, V1, V2
        let layout = FeatureLayout::for_model(&names).unwrap();
        assert!(!layout.is_identity());

        let features = FeatureExtractor::new(scaler()).extract(&sample_tx());
        let arranged = layout.arrange(&features);
        assert_eq!(arranged.len(), FEATURE_COUNT);
        assert_eq!(arranged[0], features[2]);
        assert_eq!(arranged[FEATURE_COUNT - 2], features[0]);
        assert_eq!(arranged[FEATURE_COUNT - 1], features[1]);
    }

    #[test]
    fn test_layout_rejects_mismatched_schema() {
        let mut short = feature_names();
        short.pop();
        assert_eq!(
            FeatureLayout::for_model(&short).unwrap_err(),
            FeatureSchemaError::Length {
                expected: 30,
                found: 29
            }
        );

        let mut renamed = feature_names();
        renamed[29] = "Time".to_string();
        assert_eq!(
            FeatureLayout::for_model(&renamed).unwrap_err(),
            FeatureSchemaError::Unknown("Time".to_string())
        );

        let mut duplicated = feature_names();
        duplicated[1] = "V1".to_string();
        assert_eq!(
            FeatureLayout::for_model(&duplicated).unwrap_err(),
            FeatureSchemaError::Duplicate("V1".to_string())
        );
    }
}
