//! Transaction data structures for credit card fraud scoring

use serde::{Deserialize, Serialize};

/// Number of anonymized principal components in a transaction record.
pub const PCA_COMPONENTS: usize = 28;

/// Represents a credit card transaction to be scored.
///
/// Field names on the wire match the columns of the Kaggle
/// `creditcard.csv` dataset. Every field is required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Seconds elapsed between this transaction and the first one in the dataset
    #[serde(rename = "Time")]
    pub time: f64,

    #[serde(rename = "V1")]
    pub v1: f64,
    #[serde(rename = "V2")]
    pub v2: f64,
    #[serde(rename = "V3")]
    pub v3: f64,
    #[serde(rename = "V4")]
    pub v4: f64,
    #[serde(rename = "V5")]
    pub v5: f64,
    #[serde(rename = "V6")]
    pub v6: f64,
    #[serde(rename = "V7")]
    pub v7: f64,
    #[serde(rename = "V8")]
    pub v8: f64,
    #[serde(rename = "V9")]
    pub v9: f64,
    #[serde(rename = "V10")]
    pub v10: f64,
    #[serde(rename = "V11")]
    pub v11: f64,
    #[serde(rename = "V12")]
    pub v12: f64,
    #[serde(rename = "V13")]
    pub v13: f64,
    #[serde(rename = "V14")]
    pub v14: f64,
    #[serde(rename = "V15")]
    pub v15: f64,
    #[serde(rename = "V16")]
    pub v16: f64,
    #[serde(rename = "V17")]
    pub v17: f64,
    #[serde(rename = "V18")]
    pub v18: f64,
    #[serde(rename = "V19")]
    pub v19: f64,
    #[serde(rename = "V20")]
    pub v20: f64,
    #[serde(rename = "V21")]
    pub v21: f64,
    #[serde(rename = "V22")]
    pub v22: f64,
    #[serde(rename = "V23")]
    pub v23: f64,
    #[serde(rename = "V24")]
    pub v24: f64,
    #[serde(rename = "V25")]
    pub v25: f64,
    #[serde(rename = "V26")]
    pub v26: f64,
    #[serde(rename = "V27")]
    pub v27: f64,
    #[serde(rename = "V28")]
    pub v28: f64,

    /// Transaction amount
    #[serde(rename = "Amount")]
    pub amount: f64,
}

impl TransactionRecord {
    /// Build a record from its time, principal components and amount.
    pub fn new(time: f64, components: [f64; PCA_COMPONENTS], amount: f64) -> Self {
        let [v1, v2, v3, v4, v5, v6, v7, v8, v9, v10, v11, v12, v13, v14, v15, v16, v17, v18, v19, v20, v21, v22, v23, v24, v25, v26, v27, v28] =
            components;
        Self {
            time,
            v1,
            v2,
            v3,
            v4,
            v5,
            v6,
            v7,
            v8,
            v9,
            v10,
            v11,
            v12,
            v13,
            v14,
            v15,
            v16,
            v17,
            v18,
            v19,
            v20,
            v21,
            v22,
            v23,
            v24,
            v25,
            v26,
            v27,
            v28,
            amount,
        }
    }

    /// All-zero record.
    pub fn zeroed() -> Self {
        Self::new(0.0, [0.0; PCA_COMPONENTS], 0.0)
    }

    /// Principal components `V1..V28` in column order.
    pub fn components(&self) -> [f64; PCA_COMPONENTS] {
        [
            self.v1, self.v2, self.v3, self.v4, self.v5, self.v6, self.v7, self.v8, self.v9,
            self.v10, self.v11, self.v12, self.v13, self.v14, self.v15, self.v16, self.v17,
            self.v18, self.v19, self.v20, self.v21, self.v22, self.v23, self.v24, self.v25,
            self.v26, self.v27, self.v28,
        ]
    }
}

/// A transaction with its ground-truth label, as read from a training dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledTransaction {
    pub record: TransactionRecord,
    /// 0 = legitimate, 1 = fraud
    pub class: u8,
}
