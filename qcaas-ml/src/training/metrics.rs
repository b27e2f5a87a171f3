//! Classification scoring.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Decimal places kept in every reported metric.
pub const METRIC_DECIMALS: i32 = 4;

/// Classification metrics; precision, recall and F1 are support-weighted averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Round `value` to `decimals` places; exact halves go to the even neighbour.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Score predictions against ground truth.
///
/// Classes are the union of both label sets. Each class's precision, recall and F1 are
/// weighted by its support in `y_true`; a zero denominator contributes 0.
///
/// Both slices must have the same length. Debug builds assert this; release builds
/// score the common prefix.
pub fn score(y_true: &[usize], y_pred: &[usize]) -> MetricsReport {
    debug_assert_eq!(
        y_true.len(),
        y_pred.len(),
        "score needs one prediction per label"
    );
    let n = y_true.len().min(y_pred.len());
    if n == 0 {
        return MetricsReport {
            accuracy: 0.0,
            precision: 0.0,
            recall: 0.0,
            f1_score: 0.0,
        };
    }
    let (y_true, y_pred) = (&y_true[..n], &y_pred[..n]);

    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    let classes: BTreeSet<usize> = y_true.iter().chain(y_pred).copied().collect();

    let mut precision = 0.0;
    let mut recall = 0.0;
    let mut f1 = 0.0;
    for class in classes {
        let mut tp = 0usize;
        let mut predicted = 0usize;
        let mut support = 0usize;
        for (&t, &p) in y_true.iter().zip(y_pred) {
            if p == class {
                predicted += 1;
            }
            if t == class {
                support += 1;
                if p == class {
                    tp += 1;
                }
            }
        }
        let p = ratio(tp, predicted);
        let r = ratio(tp, support);
        let f = if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 };
        let weight = support as f64 / n as f64;
        precision += weight * p;
        recall += weight * r;
        f1 += weight * f;
    }

    MetricsReport {
        accuracy: round_to(correct as f64 / n as f64, METRIC_DECIMALS),
        precision: round_to(precision, METRIC_DECIMALS),
        recall: round_to(recall, METRIC_DECIMALS),
        f1_score: round_to(f1, METRIC_DECIMALS),
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}
