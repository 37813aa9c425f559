//! Offline training pipeline
//!
//! Scale Amount and Time, split stratified on the label, fit logistic
//! regression, evaluate on the held-out rows and persist the artifacts.

use crate::config::{ArtifactsConfig, TrainingConfig};
use crate::dataset::{stratified_split, Dataset, DatasetError};
use crate::evaluation::ClassificationReport;
use crate::feature_extractor::{feature_names, FeatureExtractor};
use crate::models::artifacts::ArtifactStore;
use crate::models::logistic::{LogisticParams, LogisticRegression};
use crate::models::scaler::{ScalerArtifact, StandardScaler};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

/// Fitted artifacts plus evaluation, before persistence
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub classifier: LogisticRegression,
    pub scaler: ScalerArtifact,
    pub train_rows: usize,
    pub test_rows: usize,
    pub report: ClassificationReport,
}

/// Outcome of a training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub dataset_rows: usize,
    /// Rows per class (0, 1) in the full dataset
    pub class_counts: [usize; 2],
    pub train_rows: usize,
    pub test_rows: usize,
    /// Evaluation on the held-out split
    pub report: ClassificationReport,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

/// Train from the configured dataset and write both artifacts.
///
/// A missing dataset surfaces as [`DatasetError::NotFound`] (reachable with
/// `downcast_ref`) before anything is written.
pub fn train(config: &TrainingConfig, artifacts: &ArtifactsConfig) -> Result<TrainingReport> {
    info!(path = %config.dataset_path.display(), "Loading dataset...");
    let dataset = Dataset::from_csv_path(&config.dataset_path)?;

    let model = fit(&dataset, config)?;

    info!("Saving model...");
    let store = ArtifactStore::from_config(artifacts);
    store
        .save(&model.classifier, &model.scaler)
        .context("Failed to save artifacts")?;

    Ok(TrainingReport {
        dataset_rows: dataset.len(),
        class_counts: dataset.class_counts(),
        train_rows: model.train_rows,
        test_rows: model.test_rows,
        report: model.report,
        model_path: store.model_path().to_path_buf(),
        scaler_path: store.scaler_path().to_path_buf(),
    })
}

/// Fit scalers and classifier on an in-memory dataset and evaluate it.
pub fn fit(dataset: &Dataset, config: &TrainingConfig) -> Result<TrainedModel> {
    let [negatives, positives] = dataset.class_counts();
    info!(rows = dataset.len(), negatives, positives, "Dataset loaded");

    // Amount and Time each get their own transform, fit on that column only.
    let scaler = ScalerArtifact {
        amount: StandardScaler::fit(&dataset.amounts()).ok_or(DatasetError::Empty)?,
        time: StandardScaler::fit(&dataset.times()).ok_or(DatasetError::Empty)?,
    };
    let extractor = FeatureExtractor::new(scaler);
    let features: Vec<Vec<f64>> = dataset
        .rows
        .iter()
        .map(|row| extractor.extract(&row.record).to_vec())
        .collect();
    let labels = dataset.labels();

    info!(test_size = config.test_size, seed = config.random_state, "Splitting data...");
    let split = stratified_split(&labels, config.test_size, config.random_state)?;
    let select = |idx: &[usize]| -> (Vec<Vec<f64>>, Vec<u8>) {
        idx.iter()
            .map(|&i| (features[i].clone(), labels[i]))
            .unzip()
    };
    let (x_train, y_train) = select(&split.train);
    let (x_test, y_test) = select(&split.test);

    info!(train_rows = x_train.len(), "Training model...");
    let params = LogisticParams {
        c: config.c,
        max_iter: config.max_iter,
        tol: config.tol,
    };
    let classifier = LogisticRegression::fit(&x_train, &y_train, feature_names(), params)
        .context("Failed to fit logistic regression")?;
    info!(
        iterations = classifier.n_iter,
        intercept = classifier.intercept,
        "Model fitted"
    );

    info!(test_rows = x_test.len(), "Evaluating model...");
    let predicted: Vec<u8> = x_test.iter().map(|x| classifier.predict(x).label).collect();
    let report = ClassificationReport::new(&y_test, &predicted);
    let fraud = report.fraud();
    info!(
        precision = fraud.precision,
        recall = fraud.recall,
        f1 = fraud.f1,
        accuracy = report.accuracy,
        "Held-out evaluation"
    );

    Ok(TrainedModel {
        classifier,
        scaler,
        train_rows: x_train.len(),
        test_rows: x_test.len(),
        report,
    })
}
