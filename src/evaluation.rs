//! Held-out evaluation metrics for the binary classifier

use serde::Serialize;
use std::fmt;

/// Precision, recall and F1 for one class (or an average over classes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class and averaged metrics for a binary classification run.
///
/// Ratios with a zero denominator are reported as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// Indexed by class label
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    /// Build a report from ground truth and predicted labels (0 or 1).
    pub fn new(actual: &[u8], predicted: &[u8]) -> Self {
        debug_assert_eq!(actual.len(), predicted.len());

        // confusion[actual][predicted]
        let mut confusion = [[0usize; 2]; 2];
        for (&a, &p) in actual.iter().zip(predicted) {
            confusion[usize::from(a.min(1))][usize::from(p.min(1))] += 1;
        }

        let classes = [0usize, 1].map(|c| {
            let tp = confusion[c][c];
            let predicted_c = confusion[0][c] + confusion[1][c];
            let support = confusion[c][0] + confusion[c][1];
            let precision = ratio(tp, predicted_c);
            let recall = ratio(tp, support);
            ClassMetrics {
                precision,
                recall,
                f1: f1(precision, recall),
                support,
            }
        });

        let total = actual.len();
        let accuracy = ratio(confusion[0][0] + confusion[1][1], total);

        let macro_avg = ClassMetrics {
            precision: (classes[0].precision + classes[1].precision) / 2.0,
            recall: (classes[0].recall + classes[1].recall) / 2.0,
            f1: (classes[0].f1 + classes[1].f1) / 2.0,
            support: total,
        };

        let weighted = |get: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                classes
                    .iter()
                    .map(|m| get(m) * m.support as f64)
                    .sum::<f64>()
                    / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };

        Self {
            classes,
            accuracy,
            macro_avg,
            weighted_avg,
        }
    }

    /// Metrics for the fraud class
    pub fn fraud(&self) -> &ClassMetrics {
        &self.classes[1]
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (label, m) in self.classes.iter().enumerate() {
            write_row(f, &label.to_string(), m)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, label: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
        label, m.precision, m.recall, m.f1, m.support
    )
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_values() {
        // tp=2 fn=1 fp=1 tn=6
        let actual = [1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
        let predicted = [1, 1, 0, 1, 0, 0, 0, 0, 0, 0];
        let report = ClassificationReport::new(&actual, &predicted);

        let fraud = report.fraud();
        assert!((fraud.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((fraud.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((fraud.f1 - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(fraud.support, 3);

        let legit = &report.classes[0];
        assert!((legit.precision - 6.0 / 7.0).abs() < 1e-12);
        assert!((legit.recall - 6.0 / 7.0).abs() < 1e-12);
        assert_eq!(legit.support, 7);

        assert!((report.accuracy - 0.8).abs() < 1e-12);
        assert_eq!(report.weighted_avg.support, 10);
        assert!((report.weighted_avg.recall - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_no_positive_predictions() {
        let report = ClassificationReport::new(&[1, 0, 0], &[0, 0, 0]);
        assert_eq!(report.fraud().precision, 0.0);
        assert_eq!(report.fraud().recall, 0.0);
        assert_eq!(report.fraud().f1, 0.0);
    }

    #[test]
    fn test_metrics_in_unit_interval() {
        let actual = [0, 1, 0, 1, 1, 0, 0];
        let predicted = [1, 1, 0, 0, 1, 1, 0];
        let report = ClassificationReport::new(&actual, &predicted);
        for m in report
            .classes
            .iter()
            .chain([&report.macro_avg, &report.weighted_avg])
        {
            for v in [m.precision, m.recall, m.f1] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_display_table() {
        let report = ClassificationReport::new(&[1, 0], &[1, 0]);
        let text = report.to_string();
        assert!(text.contains("precision"));
        assert!(text.contains("macro avg"));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("1.00"));
    }
}
