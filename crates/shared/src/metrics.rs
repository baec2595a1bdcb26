//! Binary classification metrics for the positive ("in summary") class.
//! A zero denominator yields 0 rather than NaN.

use serde::{Deserialize, Serialize};

pub const DECISION_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinaryMetrics {
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
}

fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}

impl BinaryMetrics {
    /// Score predictions (`probability >= threshold` counts as positive)
    /// against 0/1 labels.
    pub fn evaluate(probabilities: &[f32], labels: &[u8], threshold: f32) -> Self {
        assert_eq!(
            probabilities.len(),
            labels.len(),
            "Vectors must have same length"
        );

        let (mut tp, mut fp, mut fn_count) = (0usize, 0usize, 0usize);
        for (&p, &y) in probabilities.iter().zip(labels) {
            match (p >= threshold, y == 1) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, true) => fn_count += 1,
                (false, false) => {}
            }
        }

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_count);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            precision,
            recall,
            f1,
        }
    }
}
