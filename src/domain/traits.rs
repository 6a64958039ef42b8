// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The predictor only needs two things from a fitted model: a
// calibrated probability and a set of per-feature weights to
// explain it with. Putting that behind a trait lets the scoring
// rules be tested against a hand-written model.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::assessment::RiskAssessment;
use crate::domain::loan::LoanRequest;

// ─── RepaymentModel ───────────────────────────────────────────────────────────
/// A fitted classifier operating on standardised feature rows.
///
/// Implementations:
///   - CalibratedClassifier → fold ensemble of logistic models + Platt calibrators
pub trait RepaymentModel {
    /// Calibrated probability that the loan is repaid, in [0, 1].
    fn repayment_probability(&self, scaled: &[f64]) -> Result<f64>;

    /// Linear weights of the representative estimator, one per feature.
    fn explanation_weights(&self) -> Result<Vec<f64>>;
}

// ─── RiskScorer ───────────────────────────────────────────────────────────────
/// Anything that can turn a raw request into a scored assessment.
///
/// Implementations:
///   - ScoreUseCase → loads (or trains) the persisted model and scores
pub trait RiskScorer {
    fn assess(&self, request: &LoanRequest) -> Result<RiskAssessment>;
}
