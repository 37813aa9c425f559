//! Standardization transforms for the Time and Amount columns

use serde::{Deserialize, Serialize};

/// Zero-mean, unit-variance transform fit on a single column.
///
/// Uses the population variance. A constant column gets a scale of 1.0 so
/// the transform only centers it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: f64,
    pub variance: f64,
    pub scale: f64,
    pub n_samples: usize,
}

impl StandardScaler {
    /// Fit on a column of values. Returns `None` for an empty column.
    pub fn fit(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        let scale = if std_dev > f64::EPSILON * mean.abs().max(1.0) {
            std_dev
        } else {
            1.0
        };

        Some(Self {
            mean,
            variance,
            scale,
            n_samples: values.len(),
        })
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }
}

/// Persisted scaling statistics: one transform per scaled column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    /// Fit on the training set's Amount column
    pub amount: StandardScaler,
    /// Fit on the training set's Time column
    pub time: StandardScaler,
}

impl ScalerArtifact {
    pub fn scale_amount(&self, amount: f64) -> f64 {
        self.amount.transform(amount)
    }

    pub fn scale_time(&self, time: f64) -> f64 {
        self.time.transform(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_statistics() {
        let scaler = StandardScaler::fit(&[1.0, 2.0, 3.0, 4.0]).unwrap();

        assert!((scaler.mean - 2.5).abs() < 1e-12);
        assert!((scaler.variance - 1.25).abs() < 1e-12);
        assert!((scaler.scale - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!(scaler.n_samples, 4);
    }

    #[test]
    fn test_transform_is_standardized() {
        let values: Vec<f64> = (0..100).map(|i| (i as f64) * 3.7 + 12.0).collect();
        let scaler = StandardScaler::fit(&values).unwrap();
        let scaled: Vec<f64> = values.iter().map(|&v| scaler.transform(v)).collect();

        let mean = scaled.iter().sum::<f64>() / scaled.len() as f64;
        let var = scaled.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / scaled.len() as f64;
        assert!(mean.abs() < 1e-9);
        assert!((var - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_column() {
        let scaler = StandardScaler::fit(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(scaler.scale, 1.0);
        assert_eq!(scaler.transform(5.0), 0.0);
        assert_eq!(scaler.transform(7.0), 2.0);
    }

    #[test]
    fn test_empty_column() {
        assert!(StandardScaler::fit(&[]).is_none());
    }

    #[test]
    fn test_columns_scaled_independently() {
        let artifact = ScalerArtifact {
            amount: StandardScaler::fit(&[0.0, 100.0]).unwrap(),
            time: StandardScaler::fit(&[0.0, 10.0]).unwrap(),
        };

        assert_eq!(artifact.scale_amount(100.0), 1.0);
        assert_eq!(artifact.scale_time(10.0), 1.0);
        assert_eq!(artifact.scale_amount(50.0), 0.0);
        assert_eq!(artifact.scale_time(50.0), 9.0);
    }
}
