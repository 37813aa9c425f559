//! Synthetic labeled transactions for local runs and tests
//!
//! Legitimate rows draw every principal component from a standard normal.
//! Fraudulent rows shift the handful of components that carry most of the
//! signal in the real dataset, and skew toward larger amounts.

use super::Dataset;
use crate::types::transaction::{LabeledTransaction, TransactionRecord, PCA_COMPONENTS};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal, Normal, NormalError, StandardNormal};

/// Two days of transactions, in seconds.
const TIME_SPAN_SECS: f64 = 172_792.0;

/// (component index, mean shift) applied to fraudulent rows
const FRAUD_SHIFTS: [(usize, f64); 6] = [
    (3, 2.5),   // V4
    (9, -2.5),  // V10
    (11, -3.0), // V12
    (13, -4.0), // V14
    (16, -3.0), // V17
    (2, -2.0),  // V3
];

/// Largest generated amount
const MAX_AMOUNT: f64 = 25_000.0;

/// Seeded generator of labeled transactions
pub struct SyntheticGenerator {
    rng: StdRng,
    fraud_components: Normal<f64>,
    legitimate_amount: LogNormal<f64>,
    fraud_amount: LogNormal<f64>,
}

impl SyntheticGenerator {
    pub fn new(seed: u64) -> Result<Self, NormalError> {
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            fraud_components: Normal::new(0.0, 1.5)?,
            legitimate_amount: LogNormal::new(3.0, 1.2)?,
            fraud_amount: LogNormal::new(4.0, 1.5)?,
        })
    }

    /// Generate a random legitimate transaction
    pub fn generate_legitimate(&mut self) -> TransactionRecord {
        let mut components = [0.0; PCA_COMPONENTS];
        for c in components.iter_mut() {
            *c = StandardNormal.sample(&mut self.rng);
        }
        let time = self.rng.gen_range(0.0..TIME_SPAN_SECS);
        let amount = round_cents(self.legitimate_amount.sample(&mut self.rng).min(MAX_AMOUNT));
        TransactionRecord::new(time.floor(), components, amount)
    }

    /// Generate a random fraudulent transaction
    pub fn generate_fraudulent(&mut self) -> TransactionRecord {
        let mut components = [0.0; PCA_COMPONENTS];
        for c in components.iter_mut() {
            *c = self.fraud_components.sample(&mut self.rng);
        }
        for (idx, shift) in FRAUD_SHIFTS {
            components[idx] += shift;
        }
        let time = self.rng.gen_range(0.0..TIME_SPAN_SECS);
        let amount = round_cents(self.fraud_amount.sample(&mut self.rng).min(MAX_AMOUNT));
        TransactionRecord::new(time.floor(), components, amount)
    }

    /// Generate `rows` transactions, `round(rows * fraud_rate)` of them
    /// fraudulent, in shuffled order.
    pub fn generate(&mut self, rows: usize, fraud_rate: f64) -> Dataset {
        let n_fraud = ((rows as f64 * fraud_rate.clamp(0.0, 1.0)).round() as usize).min(rows);

        let mut data: Vec<LabeledTransaction> = Vec::with_capacity(rows);
        for i in 0..rows {
            let (record, class) = if i < n_fraud {
                (self.generate_fraudulent(), 1)
            } else {
                (self.generate_legitimate(), 0)
            };
            data.push(LabeledTransaction { record, class });
        }
        data.shuffle(&mut self.rng);

        Dataset::new(data)
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
