// ============================================================
// Layer 5 — Predictor
// ============================================================
// Turns one LoanRequest into a RiskAssessment:
//
//   1. clamp inputs into the trained range
//   2. derive collateral_ratio, build the raw feature row
//   3. standardise with the persisted scaler
//   4. calibrated repayment probability → 0–100 score
//   5. score → decision band
//   6. top-3 (coefficient × scaled value) contributions
//
// An explanation failure is not fatal: the score still stands,
// the explanation is just empty.

use anyhow::Result;

use crate::data::scaler::StandardScaler;
use crate::domain::assessment::{round2, score_from_probability, AssessedInputs, FeatureImpact, RiskAssessment};
use crate::domain::decision::DecisionBand;
use crate::domain::loan::{LoanRequest, FEATURE_NAMES};
use crate::domain::traits::RepaymentModel;

pub const EXPLANATION_SIZE: usize = 3;

pub struct RiskPredictor<'a, M: RepaymentModel> {
    model:  &'a M,
    scaler: &'a StandardScaler,
}

impl<'a, M: RepaymentModel> RiskPredictor<'a, M> {
    pub fn new(model: &'a M, scaler: &'a StandardScaler) -> Self {
        Self { model, scaler }
    }

    pub fn predict_score(&self, request: &LoanRequest) -> Result<RiskAssessment> {
        tracing::debug!(
            borrower = %request.borrower,
            eth_price_usd = request.eth_price_usd,
            eth_price_inr = request.eth_price_inr,
            "Scoring loan request"
        );

        let loan   = request.clamp()?;
        let scaled = self.scaler.transform(&loan.feature_row())?;

        let probability = self.model.repayment_probability(&scaled)?;
        let score       = score_from_probability(probability);
        let decision    = DecisionBand::from_score(score);

        let explanation = match self.model.explanation_weights() {
            Ok(weights) => explain(&weights, &scaled, EXPLANATION_SIZE),
            Err(e) => {
                tracing::warn!("Could not generate explanation: {e:#}");
                Vec::new()
            }
        };

        tracing::debug!("p(repaid)={:.4} score={} decision={}", probability, score, decision);

        Ok(RiskAssessment {
            score,
            decision,
            explanation,
            inputs: AssessedInputs::from(&loan),
        })
    }
}

/// The `top_k` features with the largest |weight × scaled value|,
/// largest first. Ties keep feature order.
pub fn explain(weights: &[f64], scaled: &[f64], top_k: usize) -> Vec<FeatureImpact> {
    if weights.len() != FEATURE_NAMES.len() || scaled.len() != FEATURE_NAMES.len() {
        tracing::warn!(
            "Could not generate explanation: {} weights / {} values for {} features",
            weights.len(),
            scaled.len(),
            FEATURE_NAMES.len()
        );
        return Vec::new();
    }

    let mut contributions: Vec<(&str, f64)> = FEATURE_NAMES
        .iter()
        .zip(weights.iter().zip(scaled))
        .map(|(&name, (w, x))| (name, w * x))
        .collect();

    contributions.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    contributions
        .into_iter()
        .take(top_k)
        .map(|(feature, impact)| FeatureImpact { feature: feature.to_string(), impact: round2(impact) })
        .collect()
}
