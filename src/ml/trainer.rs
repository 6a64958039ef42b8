// ============================================================
// Layer 5 — Training
// ============================================================
// Two levels:
//
//   fit_logistic      one base estimator, full-batch Adam on the
//                     autodiff ndarray backend
//   train_calibrated  k stratified folds; per fold, fit a base
//                     estimator on the train part and a Platt
//                     calibrator on its logits over the held-out
//                     part
//
// Objective minimised by fit_logistic (C = inverse_regularization):
//
//   mean log-loss + ||w||² / (2·C·n)
//
// which is the usual "C · Σ log-loss + ½||w||²" objective divided
// by C·n, so the optimum is the same and the learning rate does
// not have to shrink as n grows.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{ensure, Context, Result};
use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::LoanBatcher, folds::stratified_folds};
use crate::domain::loan::FEATURE_COUNT;
use crate::infra::metrics::FoldMetrics;
use crate::ml::calibrated::{CalibratedClassifier, CalibratedFold};
use crate::ml::calibration::PlattCalibrator;
use crate::ml::model::{LogisticModel, LogisticModelConfig};
use crate::ml::{InferBackend, TrainBackend};

/// A base estimator moved off the autodiff backend, plus how it got there.
pub struct FittedLogistic {
    pub model:      LogisticModel<InferBackend>,
    pub train_loss: f64,
    pub iterations: usize,
}

pub fn fit_logistic(rows: &[Vec<f64>], labels: &[bool], cfg: &TrainConfig) -> Result<FittedLogistic> {
    ensure!(!rows.is_empty(), "cannot fit on zero rows");
    ensure!(cfg.inverse_regularization > 0.0, "inverse_regularization must be positive");

    let device: <TrainBackend as Backend>::Device = Default::default();
    let batch = LoanBatcher::<TrainBackend>::new(device.clone()).batch(rows, labels)?;
    let [_, width] = batch.features.dims();

    let mut model: LogisticModel<TrainBackend> = LogisticModelConfig::new(width).init(&device);
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();
    let l2 = 1.0 / (2.0 * cfg.inverse_regularization * rows.len() as f64);

    let mut prev_loss  = f64::INFINITY;
    let mut train_loss = f64::NAN;
    let mut iterations = 0;

    for iter in 1..=cfg.max_iter {
        let loss = model.loss(batch.features.clone(), batch.targets.clone(), l2);
        train_loss = loss.clone().into_scalar().elem::<f64>();
        iterations = iter;

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(cfg.learning_rate, model, grads);

        if iter % 100 == 0 {
            tracing::debug!("iter {:>4} | loss={:.6}", iter, train_loss);
        }
        if (prev_loss - train_loss).abs() < cfg.tol {
            break;
        }
        prev_loss = train_loss;
    }

    ensure!(train_loss.is_finite(), "training diverged (loss = {train_loss})");
    let model = model.valid();
    tracing::debug!(
        "Base estimator fit: {} iterations, loss={:.6}, bias={:.4}",
        iterations,
        train_loss,
        model.intercept()?
    );

    Ok(FittedLogistic { model, train_loss, iterations })
}

/// Logits of `model` for each row.
pub fn decision_values(model: &LogisticModel<InferBackend>, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
    let x = LoanBatcher::<InferBackend>::new(Default::default()).features(rows)?;
    let logits = model
        .decision_function(x)
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| anyhow::anyhow!("cannot read logits: {e:?}"))?;
    Ok(logits.into_iter().map(f64::from).collect())
}

/// Fit the cross-validated calibrated ensemble on already-scaled rows.
pub fn train_calibrated(
    rows:   &[Vec<f64>],
    labels: &[bool],
    cfg:    &TrainConfig,
) -> Result<(CalibratedClassifier, Vec<FoldMetrics>)> {
    ensure!(
        rows.iter().all(|r| r.len() == FEATURE_COUNT),
        "every row must have {FEATURE_COUNT} features"
    );
    let folds = stratified_folds(labels, cfg.folds).context("cannot split data into folds")?;

    let mut pairs   = Vec::with_capacity(folds.len());
    let mut metrics = Vec::with_capacity(folds.len());

    for (k, fold) in folds.iter().enumerate() {
        let (train_x, train_y) = select(rows, labels, &fold.train);
        let (test_x, test_y)   = select(rows, labels, &fold.test);

        let fitted = fit_logistic(&train_x, &train_y, cfg)
            .with_context(|| format!("fitting base estimator for fold {}", k + 1))?;

        let logits = decision_values(&fitted.model, &test_x)?;
        let calibrator = PlattCalibrator::fit(&logits, &test_y)
            .with_context(|| format!("calibrating fold {}", k + 1))?;

        let probs: Vec<f64> = logits.iter().map(|&f| calibrator.predict(f)).collect();
        let m = FoldMetrics::evaluate(k + 1, fitted.train_loss, &probs, &test_y);
        tracing::info!(
            "Fold {}/{} | iters={} | train_loss={:.4} | holdout_log_loss={:.4} | brier={:.4} | acc={:.1}%",
            k + 1, folds.len(), fitted.iterations,
            m.train_loss, m.holdout_log_loss, m.brier, m.accuracy * 100.0,
        );

        metrics.push(m);
        pairs.push(CalibratedFold::new(fitted.model, calibrator));
    }

    Ok((CalibratedClassifier::new(pairs)?, metrics))
}

fn select(rows: &[Vec<f64>], labels: &[bool], idx: &[usize]) -> (Vec<Vec<f64>>, Vec<bool>) {
    idx.iter().map(|&i| (rows[i].clone(), labels[i])).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{dataset::LoanDataset, scaler::StandardScaler, synthesizer::LoanSynthesizer};

    fn quick_config() -> TrainConfig {
        TrainConfig { max_iter: 400, learning_rate: 0.1, ..TrainConfig::default() }
    }

    fn scaled_data(n: usize) -> (Vec<Vec<f64>>, Vec<bool>) {
        let ds = LoanDataset::new(LoanSynthesizer::new(42, 2.5, 6.0).generate(n).unwrap());
        let scaler = StandardScaler::fit(&ds.feature_rows()).unwrap();
        (scaler.transform_all(&ds.feature_rows()).unwrap(), ds.labels())
    }

    #[test]
    fn test_fit_recovers_rule_signs() {
        let (x, y) = scaled_data(600);
        let fitted = fit_logistic(&x, &y, &quick_config()).unwrap();
        let w = fitted.model.coefficients().unwrap();

        // income, credit and collateral ratio help; principal hurts
        assert!(w[0] > 0.0 && w[1] > 0.0 && w[4] > 0.0, "w = {w:?}");
        assert!(w[2] < 0.0, "w = {w:?}");
        assert!(fitted.train_loss < std::f64::consts::LN_2);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = scaled_data(200);
        let a = fit_logistic(&x, &y, &quick_config()).unwrap();
        let b = fit_logistic(&x, &y, &quick_config()).unwrap();
        assert_eq!(a.model.coefficients().unwrap(), b.model.coefficients().unwrap());
        assert_eq!(a.model.intercept().unwrap(), b.model.intercept().unwrap());
        assert_eq!(a.iterations, b.iterations);
        assert!(a.iterations <= 400);
    }

    #[test]
    fn test_separable_data_logits_ordered() {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![(i as f64 - 20.0) / 10.0; 5]).collect();
        let y: Vec<bool> = (0..40).map(|i| i >= 20).collect();
        let fitted = fit_logistic(&x, &y, &quick_config()).unwrap();
        let z = decision_values(&fitted.model, &x).unwrap();
        assert!(z[0] < 0.0 && z[39] > 0.0);
    }

    #[test]
    fn test_train_calibrated_produces_fold_ensemble() {
        let (x, y) = scaled_data(500);
        let (clf, metrics) = train_calibrated(&x, &y, &quick_config()).unwrap();
        assert_eq!(clf.folds().len(), 5);
        assert_eq!(metrics.len(), 5);
        for m in &metrics {
            assert!(m.accuracy > 0.7, "{m:?}");
            assert!(m.brier < 0.25, "{m:?}");
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        let (x, y) = scaled_data(50);
        let cfg = TrainConfig { inverse_regularization: 0.0, ..quick_config() };
        assert!(fit_logistic(&x, &y, &cfg).is_err());

        let cfg = TrainConfig { folds: 1, ..quick_config() };
        assert!(train_calibrated(&x, &y, &cfg).is_err());
    }
}
