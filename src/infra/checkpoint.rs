// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Persists everything scoring needs, in one directory:
//
//   risk_model/
//     manifest.json      ← format version, feature names, fold
//                          count, Platt (a, b) per fold, training
//                          config and summary
//     scaler.json        ← StandardScaler mean / scale
//     base_fold_1.mpk    ← fold 1 base estimator weights
//     base_fold_2.mpk
//     ...
//
// Base estimators are written with Burn's NamedMpkFileRecorder at
// full precision. CompactRecorder would store f16 weights, and the
// calibrators were fitted on the f32 logits.
//
// The manifest is written last, so a crash mid-save leaves no
// manifest and `exists()` reports false.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{bail, ensure, Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::scaler::StandardScaler;
use crate::domain::loan::{FEATURE_COUNT, FEATURE_NAMES};
use crate::infra::metrics::TrainingSummary;
use crate::ml::calibrated::{CalibratedClassifier, CalibratedFold};
use crate::ml::calibration::PlattCalibrator;
use crate::ml::model::LogisticModelConfig;
use crate::ml::InferBackend;

pub const FORMAT_VERSION: u32 = 1;

const MANIFEST_FILE: &str = "manifest.json";
const SCALER_FILE:   &str = "scaler.json";

type ModelRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub feature_names:  Vec<String>,
    pub folds:          usize,
    pub calibrators:    Vec<PlattCalibrator>,
    pub config:         TrainConfig,
    pub summary:        TrainingSummary,
}

impl Manifest {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.format_version == FORMAT_VERSION,
            "unsupported artifact format version {} (expected {})",
            self.format_version,
            FORMAT_VERSION
        );
        ensure!(
            self.feature_names.iter().map(String::as_str).eq(FEATURE_NAMES),
            "artifact features {:?} do not match {:?}",
            self.feature_names,
            FEATURE_NAMES
        );
        ensure!(self.folds > 0, "manifest lists zero folds");
        ensure!(
            self.calibrators.len() == self.folds,
            "manifest lists {} folds but {} calibrators",
            self.folds,
            self.calibrators.len()
        );
        Ok(())
    }
}

/// Everything read back by `ArtifactStore::load`.
pub struct LoadedArtifacts {
    pub classifier: CalibratedClassifier,
    pub scaler:     StandardScaler,
    pub manifest:   Manifest,
}

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// True when both the manifest and the scaler are on disk.
    pub fn exists(&self) -> bool {
        self.manifest_path().exists() && self.scaler_path().exists()
    }

    pub fn save(
        &self,
        classifier: &CalibratedClassifier,
        scaler:     &StandardScaler,
        config:     &TrainConfig,
        summary:    &TrainingSummary,
    ) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))?;

        // Drop any previous manifest first so a partial save is never loaded.
        if self.manifest_path().exists() {
            fs::remove_file(self.manifest_path())
                .with_context(|| format!("Cannot replace '{}'", self.manifest_path().display()))?;
        }

        let recorder = ModelRecorder::new();
        for (k, fold) in classifier.folds().iter().enumerate() {
            let path = self.fold_path(k + 1);
            recorder
                .record(fold.base.clone().into_record(), path.clone())
                .with_context(|| format!("Failed to save base estimator to '{}'", path.display()))?;
        }

        write_json(&self.scaler_path(), scaler)?;

        let manifest = Manifest {
            format_version: FORMAT_VERSION,
            feature_names:  FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            folds:          classifier.folds().len(),
            calibrators:    classifier.calibrators(),
            config:         config.clone(),
            summary:        summary.clone(),
        };
        write_json(&self.manifest_path(), &manifest)?;

        tracing::info!("Model and scaler saved to '{}'", self.dir.display());
        Ok(())
    }

    pub fn load(&self) -> Result<LoadedArtifacts> {
        if !self.exists() {
            bail!("no saved model in '{}'", self.dir.display());
        }

        let manifest: Manifest = read_json(&self.manifest_path())?;
        manifest.validate()?;

        let scaler: StandardScaler = read_json(&self.scaler_path())?;
        scaler
            .validate(FEATURE_COUNT)
            .with_context(|| format!("Invalid scaler in '{}'", self.scaler_path().display()))?;

        let device: <InferBackend as Backend>::Device = Default::default();
        let recorder = ModelRecorder::new();
        let mut folds = Vec::with_capacity(manifest.folds);
        for (k, calibrator) in manifest.calibrators.iter().enumerate() {
            let path = self.fold_path(k + 1);
            let record = recorder
                .load(path.clone(), &device)
                .with_context(|| format!("Cannot load base estimator '{}'", path.display()))?;
            let base = LogisticModelConfig::new(FEATURE_COUNT)
                .init::<InferBackend>(&device)
                .load_record(record);
            folds.push(CalibratedFold::new(base, *calibrator));
        }

        let classifier = CalibratedClassifier::new(folds)?;
        tracing::debug!("Loaded {} folds from '{}'", manifest.folds, self.dir.display());
        Ok(LoadedArtifacts { classifier, scaler, manifest })
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }

    /// Without extension — the recorder appends `.mpk`.
    fn fold_path(&self, fold: usize) -> PathBuf {
        self.dir.join(format!("base_fold_{fold}"))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Cannot parse '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::RepaymentModel;

    fn summary() -> TrainingSummary {
        TrainingSummary::from_folds(10, 0.5, &[])
    }

    fn artifacts() -> (CalibratedClassifier, StandardScaler) {
        let device: <InferBackend as Backend>::Device = Default::default();
        let folds = (0..2)
            .map(|k| {
                let base = LogisticModelConfig::new(FEATURE_COUNT).init::<InferBackend>(&device);
                CalibratedFold::new(base, PlattCalibrator::new(-1.5, 0.1 * k as f64))
            })
            .collect();
        let scaler = StandardScaler::fit(&[vec![0.0; FEATURE_COUNT], vec![2.0; FEATURE_COUNT]]).unwrap();
        (CalibratedClassifier::new(folds).unwrap(), scaler)
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(!store.exists());

        let (clf, scaler) = artifacts();
        store.save(&clf, &scaler, &TrainConfig::default(), &summary()).unwrap();
        assert!(store.exists());
        assert!(dir.path().join("base_fold_1.mpk").exists());
        assert!(dir.path().join("base_fold_2.mpk").exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.scaler, scaler);
        assert_eq!(loaded.manifest.folds, 2);
        assert_eq!(loaded.classifier.calibrators(), clf.calibrators());

        let row = vec![0.7; FEATURE_COUNT];
        assert_eq!(
            loaded.classifier.repayment_probability(&row).unwrap(),
            clf.repayment_probability(&row).unwrap()
        );
    }

    #[test]
    fn test_load_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("nothing-here"));
        assert!(store.load().is_err());
    }

    #[test]
    fn test_load_rejects_corrupt_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let (clf, scaler) = artifacts();
        store.save(&clf, &scaler, &TrainConfig::default(), &summary()).unwrap();

        fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_load_rejects_wrong_feature_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let (clf, scaler) = artifacts();
        store.save(&clf, &scaler, &TrainConfig::default(), &summary()).unwrap();

        let path = dir.path().join(MANIFEST_FILE);
        let mut manifest: Manifest = read_json(&path).unwrap();
        manifest.feature_names.reverse();
        write_json(&path, &manifest).unwrap();

        let err = store.load().err().unwrap();
        assert!(err.to_string().contains("do not match"), "{err}");
    }

    #[test]
    fn test_load_rejects_ragged_scaler() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let (clf, scaler) = artifacts();
        store.save(&clf, &scaler, &TrainConfig::default(), &summary()).unwrap();

        fs::write(
            dir.path().join(SCALER_FILE),
            r#"{"mean":[0.0,0.0,0.0,0.0,0.0],"scale":[1.0,1.0,1.0]}"#,
        )
        .unwrap();
        let err = store.load().err().unwrap();
        assert!(format!("{err:#}").contains("5 means and 3 scales"), "{err:#}");

        fs::write(
            dir.path().join(SCALER_FILE),
            r#"{"mean":[0.0,0.0,0.0,0.0,0.0],"scale":[1.0,1.0,0.0,1.0,1.0]}"#,
        )
        .unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_load_rejects_missing_weights() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let (clf, scaler) = artifacts();
        store.save(&clf, &scaler, &TrainConfig::default(), &summary()).unwrap();

        fs::remove_file(dir.path().join("base_fold_2.mpk")).unwrap();
        assert!(store.load().is_err());
    }
}
