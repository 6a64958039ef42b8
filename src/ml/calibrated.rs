// ============================================================
// Layer 5 — Calibrated Ensemble
// ============================================================
// One (base estimator, Platt calibrator) pair per CV fold.
//
//   p(repaid | x) = mean over folds of  calibrator_k( logit_k(x) )
//
// Explanations come from the first fold's base estimator, taken
// as representative of the ensemble.

use anyhow::{ensure, Context, Result};

use crate::domain::traits::RepaymentModel;
use crate::ml::calibration::PlattCalibrator;
use crate::ml::model::LogisticModel;
use crate::ml::trainer::decision_values;
use crate::ml::InferBackend;

#[derive(Debug, Clone)]
pub struct CalibratedFold {
    pub base:       LogisticModel<InferBackend>,
    pub calibrator: PlattCalibrator,
}

impl CalibratedFold {
    pub fn new(base: LogisticModel<InferBackend>, calibrator: PlattCalibrator) -> Self {
        Self { base, calibrator }
    }
}

#[derive(Debug, Clone)]
pub struct CalibratedClassifier {
    folds: Vec<CalibratedFold>,
}

impl CalibratedClassifier {
    pub fn new(folds: Vec<CalibratedFold>) -> Result<Self> {
        ensure!(!folds.is_empty(), "a calibrated classifier needs at least one fold");
        Ok(Self { folds })
    }

    pub fn folds(&self) -> &[CalibratedFold] {
        &self.folds
    }

    pub fn calibrators(&self) -> Vec<PlattCalibrator> {
        self.folds.iter().map(|f| f.calibrator).collect()
    }

    /// The base estimator used for explanations.
    pub fn explainer(&self) -> &LogisticModel<InferBackend> {
        &self.folds[0].base
    }

    /// Calibrated repayment probability for every scaled row.
    pub fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        let mut sums = vec![0.0; rows.len()];
        for fold in &self.folds {
            let logits = decision_values(&fold.base, rows)?;
            for (s, z) in sums.iter_mut().zip(logits) {
                *s += fold.calibrator.predict(z);
            }
        }
        let k = self.folds.len() as f64;
        Ok(sums.into_iter().map(|s| s / k).collect())
    }
}

impl RepaymentModel for CalibratedClassifier {
    fn repayment_probability(&self, scaled: &[f64]) -> Result<f64> {
        self.predict_proba(&[scaled.to_vec()])?
            .first()
            .copied()
            .context("model returned no probability")
    }

    fn explanation_weights(&self) -> Result<Vec<f64>> {
        Ok(self.explainer().coefficients()?.into_iter().map(f64::from).collect())
    }
}
