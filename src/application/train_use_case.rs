// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Synthesise loan records      (Layer 4 - data)
//   Step 2: Fit the scaler, scale rows   (Layer 4 - data)
//   Step 3: Cross-validated calibration  (Layer 5 - ml)
//   Step 4: Log fold metrics             (Layer 6 - infra)
//   Step 5: Save artifacts               (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{dataset::LoanDataset, scaler::StandardScaler, synthesizer::LoanSynthesizer};
use crate::infra::{
    checkpoint::ArtifactStore,
    metrics::{MetricsLogger, TrainingSummary},
};
use crate::ml::{calibrated::CalibratedClassifier, trainer::train_calibrated};

// ─── Training Configuration ──────────────────────────────────────────────────
// All knobs for a training run. Serialisable so the manifest
// records exactly how the saved model was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub samples:                usize,
    pub seed:                   u64,
    pub noise_std:              f64,
    pub label_threshold:        f64,
    pub folds:                  usize,
    /// C: larger means weaker L2 regularisation
    pub inverse_regularization: f64,
    pub learning_rate:          f64,
    pub max_iter:               usize,
    pub tol:                    f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            samples:                1000,
            seed:                   42,
            noise_std:              2.5,
            label_threshold:        6.0,
            folds:                  5,
            inverse_regularization: 1.0,
            learning_rate:          0.05,
            max_iter:               1000,
            tol:                    1e-7,
        }
    }
}

/// What a training run hands back to its caller.
pub struct TrainedModel {
    pub classifier: CalibratedClassifier,
    pub scaler:     StandardScaler,
    pub summary:    TrainingSummary,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config:    TrainConfig,
    model_dir: PathBuf,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig, model_dir: impl Into<PathBuf>) -> Self {
        Self { config, model_dir: model_dir.into() }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainedModel> {
        let cfg = &self.config;
        tracing::info!("Training new model...");

        // ── Step 1: Synthesise training data ─────────────────────────────────
        let records = LoanSynthesizer::new(cfg.seed, cfg.noise_std, cfg.label_threshold)
            .generate(cfg.samples)?;
        let dataset = LoanDataset::new(records);
        tracing::info!(
            "Synthesised {} loan records ({:.1}% repaid)",
            dataset.len(),
            dataset.positive_rate() * 100.0
        );

        // ── Step 2: Standardise features ─────────────────────────────────────
        let raw    = dataset.feature_rows();
        let scaler = StandardScaler::fit(&raw)?;
        let scaled = scaler.transform_all(&raw)?;

        // ── Step 3: Fit base estimators + calibrators per fold ───────────────
        let (classifier, fold_metrics) = train_calibrated(&scaled, &dataset.labels(), cfg)
            .context("calibrated training failed")?;

        // ── Step 4: Metrics (one file per run, like the artifacts) ───────────
        let logger = MetricsLogger::new(&self.model_dir)?;
        for m in &fold_metrics {
            logger.log(m)?;
        }
        let summary = TrainingSummary::from_folds(dataset.len(), dataset.positive_rate(), &fold_metrics);
        tracing::info!(
            "Cross-validated: log_loss={:.4} brier={:.4} acc={:.1}%",
            summary.mean_holdout_log_loss,
            summary.mean_brier,
            summary.mean_accuracy * 100.0,
        );

        // ── Step 5: Persist ──────────────────────────────────────────────────
        ArtifactStore::new(&self.model_dir).save(&classifier, &scaler, cfg, &summary)?;

        Ok(TrainedModel { classifier, scaler, summary })
    }
}
