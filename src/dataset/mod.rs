//! Labeled transaction datasets
//!
//! Reads and writes CSV files in the layout of the public `creditcard.csv`
//! dataset: a header row with `Time`, `V1`..`V28`, `Amount` and `Class`.
//! Column order in the file does not matter; extra columns are ignored.

pub mod split;
pub mod synthetic;

use crate::types::transaction::{LabeledTransaction, TransactionRecord, PCA_COMPONENTS};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use split::{stratified_split, TrainTestSplit};
pub use synthetic::SyntheticGenerator;

/// Label column name.
pub const LABEL_COLUMN: &str = "Class";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to access dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("line {line}: column '{column}' has non-numeric or non-finite value '{value}'")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    #[error("line {line}: label '{value}' is not 0 or 1")]
    InvalidLabel { line: u64, value: String },

    #[error("dataset contains no rows")]
    Empty,

    #[error("dataset contains only class {0}; both classes are required")]
    SingleClass(u8),

    #[error("class {class} has {count} rows; at least 2 are needed to split")]
    TooFewRows { class: u8, count: usize },
}

/// Names of the transaction columns in file order.
pub fn transaction_columns() -> Vec<String> {
    let mut columns = Vec::with_capacity(PCA_COMPONENTS + 2);
    columns.push("Time".to_string());
    columns.extend((1..=PCA_COMPONENTS).map(|i| format!("V{}", i)));
    columns.push("Amount".to_string());
    columns
}

/// In-memory labeled dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<LabeledTransaction>,
}

impl Dataset {
    pub fn new(rows: Vec<LabeledTransaction>) -> Self {
        Self { rows }
    }

    /// Load a dataset from a CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse a dataset from any CSV source with a header row.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        let index_of = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        let columns = transaction_columns();
        let feature_idx = columns
            .iter()
            .map(|c| index_of(c.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let label_idx = index_of(LABEL_COLUMN)?;

        let mut rows = Vec::new();
        let mut values = [0.0; PCA_COMPONENTS + 2];
        for result in csv.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            for (slot, (&idx, name)) in values.iter_mut().zip(feature_idx.iter().zip(&columns)) {
                let raw = record.get(idx).unwrap_or("");
                *slot = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| DatasetError::InvalidValue {
                        line,
                        column: name.clone(),
                        value: raw.to_string(),
                    })?;
            }

            let raw_label = record.get(label_idx).unwrap_or("");
            let class = parse_label(raw_label).ok_or_else(|| DatasetError::InvalidLabel {
                line,
                value: raw_label.to_string(),
            })?;

            let mut components = [0.0; PCA_COMPONENTS];
            components.copy_from_slice(&values[1..=PCA_COMPONENTS]);
            rows.push(LabeledTransaction {
                record: TransactionRecord::new(values[0], components, values[PCA_COMPONENTS + 1]),
                class,
            });
        }

        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { rows })
    }

    /// Write the dataset as CSV, creating parent directories.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), DatasetError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DatasetError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        let mut header = transaction_columns();
        header.push(LABEL_COLUMN.to_string());
        writer.write_record(&header)?;

        for row in &self.rows {
            let tx = &row.record;
            let mut fields = Vec::with_capacity(header.len());
            fields.push(tx.time.to_string());
            fields.extend(tx.components().iter().map(|v| v.to_string()));
            fields.push(tx.amount.to_string());
            fields.push(row.class.to_string());
            writer.write_record(&fields)?;
        }

        writer.flush().map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row counts for class 0 and class 1.
    pub fn class_counts(&self) -> [usize; 2] {
        let positives = self.rows.iter().filter(|r| r.class == 1).count();
        [self.rows.len() - positives, positives]
    }

    pub fn labels(&self) -> Vec<u8> {
        self.rows.iter().map(|r| r.class).collect()
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.record.amount).collect()
    }

    pub fn times(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.record.time).collect()
    }
}

/// Accepts `0`/`1` as well as float spellings such as `1.0`.
fn parse_label(raw: &str) -> Option<u8> {
    match raw.parse::<f64>().ok()? {
        v if v == 0.0 => Some(0),
        v if v == 1.0 => Some(1),
        _ => None,
    }
}
