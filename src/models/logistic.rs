//! L2-regularized logistic regression
//!
//! Minimizes the primal objective
//!
//! ```text
//! 0.5 * ||w||^2 + C * sum_i log(1 + exp(-y_i * w . x_i))
//! ```
//!
//! with `y_i` in {-1, +1} and the intercept folded into `w` as the weight of a
//! constant unit feature (so it is regularized along with the coefficients).
//! The problem is strictly convex; it is solved with damped Newton steps.

use crate::types::prediction::Prediction;
use chrono::{DateTime, Utc};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Hyper-parameters for fitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularization strength
    pub c: f64,
    /// Maximum number of Newton iterations
    pub max_iter: usize,
    /// Stop once the gradient norm drops below `tol` times its initial value
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tol: 1e-4,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("cannot fit on an empty training set")]
    Empty,

    #[error("row {row} has {found} features, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{labels} labels for {rows} rows")]
    LabelCount { rows: usize, labels: usize },

    #[error("training labels contain a single class ({0}); both 0 and 1 are required")]
    SingleClass(u8),

    #[error("invalid label {0}; expected 0 or 1")]
    InvalidLabel(u8),

    #[error("Newton system is not positive definite")]
    NotPositiveDefinite,
}

/// Fitted binary logistic-regression classifier.
///
/// Carries the ordered feature names it was fit on, so the serving side can
/// align its input columns to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub params: LogisticParams,
    /// Newton iterations actually run
    pub n_iter: usize,
    pub trained_at: DateTime<Utc>,
}

impl LogisticRegression {
    /// Fit on row-major features and 0/1 labels.
    pub fn fit(
        rows: &[Vec<f64>],
        labels: &[u8],
        feature_names: Vec<String>,
        params: LogisticParams,
    ) -> Result<Self, FitError> {
        if rows.is_empty() {
            return Err(FitError::Empty);
        }
        if rows.len() != labels.len() {
            return Err(FitError::LabelCount {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        let n_features = feature_names.len();
        for (row, x) in rows.iter().enumerate() {
            if x.len() != n_features {
                return Err(FitError::DimensionMismatch {
                    row,
                    expected: n_features,
                    found: x.len(),
                });
            }
        }
        if let Some(&bad) = labels.iter().find(|&&l| l > 1) {
            return Err(FitError::InvalidLabel(bad));
        }
        if labels.iter().all(|&l| l == labels[0]) {
            return Err(FitError::SingleClass(labels[0]));
        }

        let problem = Problem::new(rows, labels, params.c);
        let mut w = DVector::zeros(n_features + 1);
        let mut n_iter = 0;

        let mut loss = problem.objective(&w);
        let (mut grad, mut hessian) = problem.gradient_hessian(&w);
        let initial_norm = grad.norm();

        while n_iter < params.max_iter && grad.norm() > params.tol * initial_norm {
            let step = hessian
                .cholesky()
                .ok_or(FitError::NotPositiveDefinite)?
                .solve(&-&grad);
            let slope = grad.dot(&step);

            // Backtracking line search on the Armijo condition.
            let mut t = 1.0;
            let (candidate, candidate_loss) = loop {
                let candidate = &w + &step * t;
                let candidate_loss = problem.objective(&candidate);
                if candidate_loss <= loss + 1e-4 * t * slope || t < 1e-10 {
                    break (candidate, candidate_loss);
                }
                t *= 0.5;
            };

            w = candidate;
            loss = candidate_loss;
            n_iter += 1;
            (grad, hessian) = problem.gradient_hessian(&w);

            debug!(iteration = n_iter, loss, step_size = t, "Newton step");
        }

        if grad.norm() > params.tol * initial_norm {
            warn!(
                max_iter = params.max_iter,
                grad_norm = grad.norm(),
                "Logistic regression did not converge; increase max_iter"
            );
        }

        Ok(Self {
            feature_names,
            coefficients: w.rows(0, n_features).iter().copied().collect(),
            intercept: w[n_features],
            params,
            n_iter,
            trained_at: Utc::now(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Signed distance to the decision boundary. `features` must be in
    /// `feature_names` order.
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        debug_assert_eq!(features.len(), self.coefficients.len());
        self.coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    /// Positive-class probability.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.decision_function(features))
    }

    /// Class label and positive-class probability.
    pub fn predict(&self, features: &[f64]) -> Prediction {
        let decision = self.decision_function(features);
        Prediction {
            label: u8::from(decision > 0.0),
            probability: sigmoid(decision),
        }
    }
}

/// Training data with a trailing column of ones for the intercept.
struct Problem {
    x: DMatrix<f64>,
    signs: DVector<f64>,
    c: f64,
}

impl Problem {
    fn new(rows: &[Vec<f64>], labels: &[u8], c: f64) -> Self {
        let dim = rows[0].len() + 1;
        let x = DMatrix::from_fn(rows.len(), dim, |i, j| {
            rows[i].get(j).copied().unwrap_or(1.0)
        });
        let signs = DVector::from_iterator(
            labels.len(),
            labels.iter().map(|&l| if l == 1 { 1.0 } else { -1.0 }),
        );
        Self { x, signs, c }
    }

    fn objective(&self, w: &DVector<f64>) -> f64 {
        let margins = &self.x * w;
        let data_loss: f64 = margins
            .iter()
            .zip(self.signs.iter())
            .map(|(&z, &y)| log_one_plus_exp_neg(y * z))
            .sum();
        0.5 * w.dot(w) + self.c * data_loss
    }

    /// Gradient `w + C X' r` and Hessian `I + C X' D X`.
    fn gradient_hessian(&self, w: &DVector<f64>) -> (DVector<f64>, DMatrix<f64>) {
        let margins = &self.x * w;
        let residual = margins.zip_map(&self.signs, |z, y| self.c * (sigmoid(y * z) - 1.0) * y);
        let curvature = margins.map(|z| {
            let p = sigmoid(z);
            self.c * p * (1.0 - p)
        });

        let grad = w + self.x.tr_mul(&residual);

        let mut weighted = self.x.clone();
        for (mut row, d) in weighted.row_iter_mut().zip(curvature.iter()) {
            row *= *d;
        }
        let dim = w.len();
        let hessian = DMatrix::identity(dim, dim) + self.x.tr_mul(&weighted);

        (grad, hessian)
    }
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `log(1 + exp(-m))` without overflow.
fn log_one_plus_exp_neg(m: f64) -> f64 {
    if m > 0.0 {
        (-m).exp().ln_1p()
    } else {
        -m + m.exp().ln_1p()
    }
}
