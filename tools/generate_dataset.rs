//! Synthetic Dataset Generator
//!
//! Writes labeled transactions in the `creditcard.csv` layout so the trainer
//! can be exercised without the real dataset.

use anyhow::{ensure, Context, Result};
use card_fraud_scoring::{
    config::LoggingConfig, dataset::SyntheticGenerator, logging::init_logging,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "generate-dataset", version, about = "Write a synthetic labeled transaction dataset")]
struct Cli {
    /// Number of rows to generate
    #[arg(long, default_value_t = 10_000)]
    rows: usize,
    /// Fraction of fraudulent rows
    #[arg(long, default_value_t = 0.05)]
    fraud_rate: f64,
    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Output CSV path
    #[arg(long, default_value = "data/creditcard.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig::default())?;

    ensure!(cli.rows > 0, "--rows must be positive");
    ensure!(
        (0.0..=1.0).contains(&cli.fraud_rate),
        "--fraud-rate must be in [0, 1], got {}",
        cli.fraud_rate
    );

    info!(
        rows = cli.rows,
        fraud_rate = cli.fraud_rate,
        seed = cli.seed,
        "Generating synthetic transactions"
    );
    let dataset = SyntheticGenerator::new(cli.seed)
        .context("Invalid synthetic distribution parameters")?
        .generate(cli.rows, cli.fraud_rate);

    dataset
        .write_csv(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    let [legitimate, fraudulent] = dataset.class_counts();
    info!(
        path = %cli.output.display(),
        legitimate,
        fraudulent,
        "Dataset written"
    );
    Ok(())
}
