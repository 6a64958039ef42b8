// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn-specific model code lives here.
//
//   model.rs       — LogisticModel: one Linear(5 → 1) layer
//   trainer.rs     — full-batch Adam fit, k-fold calibrated training
//   calibration.rs — Platt (sigmoid) calibrator, Newton's method
//   calibrated.rs  — fold ensemble of (base estimator, calibrator)
//   predictor.rs   — clamp → scale → score → band → explanation
//
// Training runs on Autodiff<NdArray>; trained models are moved to
// plain NdArray with `.valid()` for persistence and scoring.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

use burn::backend::{Autodiff, NdArray};

pub type TrainBackend = Autodiff<NdArray>;
pub type InferBackend = NdArray;

/// Logistic regression as a Burn module
pub mod model;

/// Base-estimator fitting and cross-validated calibration
pub mod trainer;

/// Sigmoid calibration of decision values
pub mod calibration;

/// Averaged calibrated probabilities across folds
pub mod calibrated;

/// Request → assessment
pub mod predictor;
