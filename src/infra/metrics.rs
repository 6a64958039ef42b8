// ============================================================
// Layer 6 — Training Metrics
// ============================================================
// Each CV fold is scored on its own held-out part, with the
// calibrated probabilities the fold will later serve:
//
//   train_loss        — final regularised objective of the base fit
//   holdout_log_loss  — cross-entropy of calibrated probabilities
//   brier             — mean squared error of calibrated probabilities
//   accuracy          — fraction with (p >= 0.5) == repaid
//
// Each training run starts {model_dir}/metrics.csv afresh, so the
// file always describes the model saved beside it. The fold mean
// is kept as a TrainingSummary inside the manifest.
//
// Example CSV output:
//   fold,train_loss,holdout_log_loss,brier,accuracy
//   1,0.321004,0.334518,0.101220,0.855000
//   2,0.318870,0.341002,0.103911,0.850000

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

const LOG_LOSS_EPS: f64 = 1e-15;
const METRICS_FILE: &str = "metrics.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldMetrics {
    /// 1-based fold number
    pub fold:             usize,
    pub train_loss:       f64,
    pub holdout_log_loss: f64,
    pub brier:            f64,
    pub accuracy:         f64,
}

impl FoldMetrics {
    /// Score calibrated probabilities against the held-out labels.
    pub fn evaluate(fold: usize, train_loss: f64, probs: &[f64], labels: &[bool]) -> Self {
        let n = probs.len().min(labels.len());
        if n == 0 {
            return Self { fold, train_loss, holdout_log_loss: f64::NAN, brier: f64::NAN, accuracy: 0.0 };
        }

        let mut log_loss = 0.0;
        let mut brier    = 0.0;
        let mut correct  = 0usize;
        for (&p, &y) in probs.iter().zip(labels).take(n) {
            let t = if y { 1.0 } else { 0.0 };
            let clipped = p.clamp(LOG_LOSS_EPS, 1.0 - LOG_LOSS_EPS);
            log_loss -= t * clipped.ln() + (1.0 - t) * (1.0 - clipped).ln();
            brier    += (p - t) * (p - t);
            if (p >= 0.5) == y {
                correct += 1;
            }
        }

        let n = n as f64;
        Self {
            fold,
            train_loss,
            holdout_log_loss: log_loss / n,
            brier:            brier / n,
            accuracy:         correct as f64 / n,
        }
    }
}

/// Fold-averaged metrics for one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub samples:               usize,
    pub positive_rate:         f64,
    pub folds:                 usize,
    pub mean_train_loss:       f64,
    pub mean_holdout_log_loss: f64,
    pub mean_brier:            f64,
    pub mean_accuracy:         f64,
}

impl TrainingSummary {
    pub fn from_folds(samples: usize, positive_rate: f64, folds: &[FoldMetrics]) -> Self {
        let k = folds.len().max(1) as f64;
        let mean = |f: fn(&FoldMetrics) -> f64| folds.iter().map(f).sum::<f64>() / k;
        Self {
            samples,
            positive_rate,
            folds:                 folds.len(),
            mean_train_loss:       mean(|m| m.train_loss),
            mean_holdout_log_loss: mean(|m| m.holdout_log_loss),
            mean_brier:            mean(|m| m.brier),
            mean_accuracy:         mean(|m| m.accuracy),
        }
    }
}

/// Writes one training run's fold metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Truncates any previous run's CSV and writes the header.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join(METRICS_FILE);
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "fold,train_loss,holdout_log_loss,brier,accuracy")?;
        tracing::debug!("Started metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &FoldMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.fold, m.train_loss, m.holdout_log_loss, m.brier, m.accuracy,
        )?;
        Ok(())
    }
}
