//! Persistence of fitted model artifacts

use crate::config::ArtifactsConfig;
use crate::feature_extractor::FeatureSchemaError;
use crate::models::logistic::LogisticRegression;
use crate::models::scaler::ScalerArtifact;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to access artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {} is not valid: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("classifier feature schema does not match the service: {0}")]
    FeatureMismatch(#[from] FeatureSchemaError),
}

/// File locations of the classifier and scaler artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    model_path: PathBuf,
    scaler_path: PathBuf,
}

impl ArtifactStore {
    pub fn new(model_path: impl Into<PathBuf>, scaler_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            scaler_path: scaler_path.into(),
        }
    }

    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self::new(&config.model_path, &config.scaler_path)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    /// Artifact paths that do not exist on disk.
    pub fn missing(&self) -> Vec<&Path> {
        [self.model_path.as_path(), self.scaler_path.as_path()]
            .into_iter()
            .filter(|p| !p.exists())
            .collect()
    }

    /// Write both artifacts, replacing any existing files.
    pub fn save(
        &self,
        classifier: &LogisticRegression,
        scaler: &ScalerArtifact,
    ) -> Result<(), ArtifactError> {
        write_json(&self.model_path, classifier)?;
        write_json(&self.scaler_path, scaler)?;
        info!(
            model = %self.model_path.display(),
            scaler = %self.scaler_path.display(),
            "Artifacts saved"
        );
        Ok(())
    }

    pub fn load_classifier(&self) -> Result<LogisticRegression, ArtifactError> {
        read_json(&self.model_path)
    }

    pub fn load_scaler(&self) -> Result<ScalerArtifact, ArtifactError> {
        read_json(&self.scaler_path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(io_err)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}
