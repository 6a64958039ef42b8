// ============================================================
// Layer 2 — Score Use Case
// ============================================================
// Owns the fitted model for the lifetime of one CLI call.
//
// Loading rules (load_or_train):
//   - artifacts present and valid → use them
//   - artifacts missing           → train and save
//   - artifacts present but bad   → log the error, retrain
//   - retrain requested           → train and save unconditionally

use anyhow::Result;
use std::path::PathBuf;

use crate::application::train_use_case::{TrainConfig, TrainUseCase};
use crate::data::scaler::StandardScaler;
use crate::domain::{assessment::RiskAssessment, loan::LoanRequest, traits::RiskScorer};
use crate::infra::checkpoint::ArtifactStore;
use crate::ml::{calibrated::CalibratedClassifier, predictor::RiskPredictor};

#[derive(Debug, Clone)]
pub struct ScoreConfig {
    pub model_dir: PathBuf,
    pub retrain:   bool,
    pub train:     TrainConfig,
}

pub struct ScoreUseCase {
    classifier: CalibratedClassifier,
    scaler:     StandardScaler,
}

impl ScoreUseCase {
    pub fn load_or_train(cfg: &ScoreConfig) -> Result<Self> {
        let store = ArtifactStore::new(&cfg.model_dir);

        if cfg.retrain {
            tracing::info!("Retrain requested");
            return Self::train(cfg);
        }
        if !store.exists() {
            return Self::train(cfg);
        }

        match store.load() {
            Ok(loaded) => {
                tracing::info!("Loaded existing model and scaler.");
                tracing::debug!(
                    "{} folds, trained on {} samples (cv accuracy {:.1}%)",
                    loaded.manifest.folds,
                    loaded.manifest.summary.samples,
                    loaded.manifest.summary.mean_accuracy * 100.0,
                );
                Ok(Self { classifier: loaded.classifier, scaler: loaded.scaler })
            }
            Err(e) => {
                tracing::error!("Error loading model: {e:#}. Retraining...");
                Self::train(cfg)
            }
        }
    }

    fn train(cfg: &ScoreConfig) -> Result<Self> {
        let trained = TrainUseCase::new(cfg.train.clone(), &cfg.model_dir).execute()?;
        Ok(Self { classifier: trained.classifier, scaler: trained.scaler })
    }
}

impl RiskScorer for ScoreUseCase {
    fn assess(&self, request: &LoanRequest) -> Result<RiskAssessment> {
        RiskPredictor::new(&self.classifier, &self.scaler).predict_score(request)
    }
}
