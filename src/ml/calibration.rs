// ============================================================
// Layer 5 — Sigmoid (Platt) Calibration
// ============================================================
// A logistic model's raw probabilities are often over- or
// under-confident. Platt scaling fits a second, one-dimensional
// sigmoid on held-out decision values f:
//
//   p(repaid | f) = 1 / (1 + exp(a·f + b))
//
// Targets are smoothed to avoid overfitting the extremes:
//   positives → (n₊ + 1) / (n₊ + 2)
//   negatives →  1 / (n₋ + 2)
//
// (a, b) minimise the cross-entropy against those targets with
// Newton's method and a backtracking line search, starting from
// a = 0, b = ln((n₋ + 1) / (n₊ + 1)).
//
// Reference: Platt (1999), Lin, Lin & Weng (2007)
//            "A note on Platt's probabilistic outputs for SVMs"

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_ITER: usize = 100;
const MIN_STEP: f64 = 1e-10;
const HESSIAN_RIDGE: f64 = 1e-12;
const GRAD_EPS: f64 = 1e-5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("cannot calibrate on zero samples")]
    Empty,

    #[error("{values} decision values but {labels} labels")]
    LengthMismatch { values: usize, labels: usize },

    #[error("decision values must be finite")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlattCalibrator {
    pub a: f64,
    pub b: f64,
}

impl PlattCalibrator {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn fit(decision_values: &[f64], labels: &[bool]) -> Result<Self, CalibrationError> {
        if decision_values.is_empty() {
            return Err(CalibrationError::Empty);
        }
        if decision_values.len() != labels.len() {
            return Err(CalibrationError::LengthMismatch {
                values: decision_values.len(),
                labels: labels.len(),
            });
        }
        if decision_values.iter().any(|f| !f.is_finite()) {
            return Err(CalibrationError::NonFinite);
        }

        let n_pos = labels.iter().filter(|&&y| y).count() as f64;
        let n_neg = labels.len() as f64 - n_pos;
        let hi = (n_pos + 1.0) / (n_pos + 2.0);
        let lo = 1.0 / (n_neg + 2.0);
        let targets: Vec<f64> = labels.iter().map(|&y| if y { hi } else { lo }).collect();

        let mut a = 0.0;
        let mut b = ((n_neg + 1.0) / (n_pos + 1.0)).ln();
        let mut fval = objective(decision_values, &targets, a, b);

        for iter in 0..MAX_ITER {
            // Gradient and Hessian of the objective at (a, b)
            let (mut h11, mut h22, mut h21) = (HESSIAN_RIDGE, HESSIAN_RIDGE, 0.0);
            let (mut g1, mut g2) = (0.0, 0.0);
            for (&f, &t) in decision_values.iter().zip(&targets) {
                let p = sigmoid_neg(a * f + b);
                let d2 = p * (1.0 - p);
                h11 += f * f * d2;
                h22 += d2;
                h21 += f * d2;
                let d1 = t - p;
                g1 += f * d1;
                g2 += d1;
            }

            if g1.abs() < GRAD_EPS && g2.abs() < GRAD_EPS {
                tracing::debug!("Platt fit converged after {} iterations", iter);
                break;
            }

            let det = h11 * h22 - h21 * h21;
            let da = -(h22 * g1 - h21 * g2) / det;
            let db = -(-h21 * g1 + h11 * g2) / det;
            let gd = g1 * da + g2 * db;

            let mut step = 1.0;
            while step >= MIN_STEP {
                let (new_a, new_b) = (a + step * da, b + step * db);
                let new_f = objective(decision_values, &targets, new_a, new_b);
                if new_f < fval + 1e-4 * step * gd {
                    a = new_a;
                    b = new_b;
                    fval = new_f;
                    break;
                }
                step /= 2.0;
            }

            if step < MIN_STEP {
                tracing::warn!("Platt line search failed at iteration {}; keeping a={:.4}, b={:.4}", iter, a, b);
                break;
            }
        }

        Ok(Self { a, b })
    }

    /// Calibrated probability of the positive class for decision value `f`.
    pub fn predict(&self, f: f64) -> f64 {
        sigmoid_neg(self.a * f + self.b)
    }
}

/// 1 / (1 + exp(x)), evaluated without overflow.
fn sigmoid_neg(x: f64) -> f64 {
    if x >= 0.0 {
        let e = (-x).exp();
        e / (1.0 + e)
    } else {
        1.0 / (1.0 + x.exp())
    }
}

/// Cross-entropy of the smoothed targets under parameters (a, b).
fn objective(values: &[f64], targets: &[f64], a: f64, b: f64) -> f64 {
    values
        .iter()
        .zip(targets)
        .map(|(&f, &t)| {
            let z = a * f + b;
            if z >= 0.0 {
                t * z + (-z).exp().ln_1p()
            } else {
                (t - 1.0) * z + z.exp().ln_1p()
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_is_decreasing_sigmoid_in_a() {
        let c = PlattCalibrator::new(-2.0, 0.0);
        assert!((c.predict(0.0) - 0.5).abs() < 1e-12);
        assert!(c.predict(3.0) > c.predict(1.0));
        assert!(c.predict(-50.0) >= 0.0 && c.predict(50.0) <= 1.0);
    }

    #[test]
    fn test_fit_learns_increasing_map() {
        // Positive decision values mostly belong to positives.
        let values: Vec<f64> = (-50..50).map(|i| i as f64 / 10.0).collect();
        let labels: Vec<bool> = values
            .iter()
            .enumerate()
            .map(|(i, &f)| if i % 7 == 0 { f < 0.0 } else { f > 0.0 })
            .collect();
        let c = PlattCalibrator::fit(&values, &labels).unwrap();
        assert!(c.a < 0.0, "a = {}", c.a);
        assert!(c.predict(4.0) > 0.8);
        assert!(c.predict(-4.0) < 0.2);
    }

    #[test]
    fn test_uninformative_values_give_base_rate() {
        // Constant decision values: only the prior can be learned.
        let values = vec![0.0; 40];
        let labels: Vec<bool> = (0..40).map(|i| i < 30).collect();
        let c = PlattCalibrator::fit(&values, &labels).unwrap();
        let p = c.predict(0.0);
        // smoothed targets pull 0.75 slightly towards 0.5
        assert!((p - 0.75).abs() < 0.03, "p = {p}");
    }

    #[test]
    fn test_single_class_still_fits() {
        let values = vec![1.0, 2.0, 3.0];
        let c = PlattCalibrator::fit(&values, &[true, true, true]).unwrap();
        assert!(c.predict(2.0) > 0.5);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(PlattCalibrator::fit(&[], &[]), Err(CalibrationError::Empty));
        assert_eq!(
            PlattCalibrator::fit(&[1.0], &[true, false]),
            Err(CalibrationError::LengthMismatch { values: 1, labels: 2 })
        );
        assert_eq!(
            PlattCalibrator::fit(&[f64::NAN], &[true]),
            Err(CalibrationError::NonFinite)
        );
    }
}
