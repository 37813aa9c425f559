//! Model Trainer
//!
//! Fits the fraud classifier on the configured dataset, prints the held-out
//! classification report and writes the classifier and scaler artifacts.

use anyhow::Result;
use card_fraud_scoring::{
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    dataset::DatasetError,
    logging::init_logging,
    trainer,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

const DATASET_URL: &str = "https://www.kaggle.com/datasets/mlg-ulb/creditcardfraud";

#[derive(Parser)]
#[command(name = "train-model", version, about = "Train the fraud classifier and write its artifacts")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Dataset path, overriding `training.dataset_path`
    #[arg(long)]
    dataset: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from_path(&cli.config)?;
    if let Some(dataset) = cli.dataset {
        config.training.dataset_path = dataset;
    }
    init_logging(&config.logging)?;
    info!("Starting model training");

    let outcome = match trainer::train(&config.training, &config.artifacts) {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(DatasetError::NotFound(path)) = e.downcast_ref::<DatasetError>() {
                eprintln!("ERROR: Dataset not found at {}", path.display());
                eprintln!(
                    "Please download 'creditcard.csv' from {} and place it at that path, \
                     or create a synthetic one with `generate-dataset`.",
                    DATASET_URL
                );
                return Ok(ExitCode::FAILURE);
            }
            return Err(e);
        }
    };

    println!("{}", outcome.report);
    info!(
        rows = outcome.dataset_rows,
        fraudulent = outcome.class_counts[1],
        train_rows = outcome.train_rows,
        test_rows = outcome.test_rows,
        "Training complete"
    );
    println!(
        "Model training complete. Model saved to '{}', scaler saved to '{}'",
        outcome.model_path.display(),
        outcome.scaler_path.display()
    );

    Ok(ExitCode::SUCCESS)
}
