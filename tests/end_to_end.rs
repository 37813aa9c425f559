//! Train on a synthetic dataset, then serve the resulting artifacts

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use card_fraud_scoring::{
    api::{routes, AppState},
    config::{ArtifactsConfig, TrainingConfig},
    dataset::SyntheticGenerator,
    models::{ArtifactStore, InferenceEngine},
    trainer, TransactionRecord,
};
use serde_json::Value;
use std::path::Path;
use tower::ServiceExt;

fn configs(dir: &Path) -> (TrainingConfig, ArtifactsConfig) {
    let training = TrainingConfig {
        dataset_path: dir.join("creditcard.csv"),
        ..TrainingConfig::default()
    };
    let artifacts = ArtifactsConfig {
        model_path: dir.join("artifacts/fraud_detection_model.json"),
        scaler_path: dir.join("artifacts/scaler.json"),
    };
    (training, artifacts)
}

fn train_synthetic(dir: &Path) -> ArtifactsConfig {
    let (training, artifacts) = configs(dir);
    SyntheticGenerator::new(42)
        .unwrap()
        .generate(1000, 0.05)
        .write_csv(&training.dataset_path)
        .unwrap();
    trainer::train(&training, &artifacts).unwrap();
    artifacts
}

async fn predict(state: AppState, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = routes(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_training_produces_artifacts_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let (training, artifacts) = configs(dir.path());
    SyntheticGenerator::new(42)
        .unwrap()
        .generate(1000, 0.05)
        .write_csv(&training.dataset_path)
        .unwrap();

    let outcome = trainer::train(&training, &artifacts).unwrap();

    assert!(artifacts.model_path.exists());
    assert!(artifacts.scaler_path.exists());
    assert_eq!(outcome.dataset_rows, 1000);
    assert_eq!(outcome.class_counts, [950, 50]);
    assert_eq!(outcome.test_rows, 200);
    assert_eq!(outcome.train_rows, 800);

    let fraud = outcome.report.fraud();
    assert!((0.0..=1.0).contains(&fraud.precision));
    assert!((0.0..=1.0).contains(&fraud.recall));
    assert_eq!(fraud.support, 10);
}

#[test]
fn test_training_is_reproducible() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let a = ArtifactStore::from_config(&train_synthetic(first.path()));
    let b = ArtifactStore::from_config(&train_synthetic(second.path()));

    let model_a = a.load_classifier().unwrap();
    let model_b = b.load_classifier().unwrap();
    assert_eq!(model_a.coefficients, model_b.coefficients);
    assert_eq!(model_a.intercept, model_b.intercept);
    assert_eq!(a.load_scaler().unwrap(), b.load_scaler().unwrap());
}

#[tokio::test]
async fn test_zero_transaction_matches_manual_computation() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = train_synthetic(dir.path());

    let engine = InferenceEngine::load(&artifacts).unwrap().expect("artifacts present");
    let zero = TransactionRecord::zeroed();
    let served_probability = engine.predict(&zero).unwrap().probability;

    let (status, body) = predict(
        AppState::new(Some(engine)),
        serde_json::to_string(&zero).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    for key in ["is_fraud", "fraud_probability", "prediction"] {
        assert!(body.get(key).is_some(), "missing key {}: {}", key, body);
    }

    // Recompute from the raw artifacts by feature name.
    let store = ArtifactStore::from_config(&artifacts);
    let classifier = store.load_classifier().unwrap();
    let scaler = store.load_scaler().unwrap();
    let scaled_amount = (0.0 - scaler.amount.mean) / scaler.amount.scale;
    let scaled_time = (0.0 - scaler.time.mean) / scaler.time.scale;
    let z: f64 = classifier
        .feature_names
        .iter()
        .zip(&classifier.coefficients)
        .map(|(name, w)| match name.as_str() {
            "scaled_amount" => w * scaled_amount,
            "scaled_time" => w * scaled_time,
            _ => 0.0,
        })
        .sum::<f64>()
        + classifier.intercept;
    let manual = 1.0 / (1.0 + (-z).exp());

    assert!((served_probability - manual).abs() < 1e-6);
    assert_eq!(
        body["fraud_probability"],
        format!("{:.2}%", manual * 100.0)
    );
    assert_eq!(body["is_fraud"], u64::from(z > 0.0));
}

#[tokio::test]
async fn test_missing_field_never_reaches_scorer() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = train_synthetic(dir.path());
    let engine = InferenceEngine::load(&artifacts).unwrap();

    let mut payload = serde_json::to_value(TransactionRecord::zeroed()).unwrap();
    payload.as_object_mut().unwrap().remove("V14");

    let (status, body) = predict(AppState::new(engine), payload.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.get("is_fraud").is_none());
}

#[tokio::test]
async fn test_service_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let (_, artifacts) = configs(dir.path());

    let engine = InferenceEngine::load(&artifacts).unwrap();
    assert!(engine.is_none());

    let body = serde_json::to_string(&TransactionRecord::zeroed()).unwrap();
    let (status, response) = predict(AppState::new(engine), body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.get("error").is_some());
    assert!(response.get("is_fraud").is_none());
}
