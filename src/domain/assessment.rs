// ============================================================
// Layer 3 — Risk Assessment (scoring output)
// ============================================================
// The shape printed on stdout. Field order matters: serde_json
// writes struct fields in declaration order, and callers expect
//
//   {"score": .., "decision": .., "explanation": [..],
//    "inputs": {"principal", "tenure", "collateral", "collateral_ratio"}}
//
// Reference: Rust Book §5 (Structs), serde derive docs

use serde::{Deserialize, Serialize};

use crate::domain::decision::DecisionBand;
use crate::domain::loan::ClampedLoan;

/// One entry of the top-3 explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImpact {
    pub feature: String,
    /// coefficient × scaled value, rounded to 2 decimals
    pub impact: f64,
}

/// The clamped values the model actually saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessedInputs {
    pub principal:        f64,
    pub tenure:           u32,
    pub collateral:       f64,
    pub collateral_ratio: f64,
}

impl From<&ClampedLoan> for AssessedInputs {
    fn from(loan: &ClampedLoan) -> Self {
        Self {
            principal:        loan.principal,
            tenure:           loan.tenure,
            collateral:       loan.collateral,
            collateral_ratio: round2(loan.collateral_ratio()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0–100, the calibrated repayment probability truncated to a percentage
    pub score:       u32,
    pub decision:    DecisionBand,
    pub explanation: Vec<FeatureImpact>,
    pub inputs:      AssessedInputs,
}

/// `{"error": "...", "score": 0}` — printed instead of an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
    pub score: u32,
}

impl ErrorReport {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), score: 0 }
    }
}

/// Truncate a probability to an integer percentage.
pub fn score_from_probability(probability: f64) -> u32 {
    (probability.clamp(0.0, 1.0) * 100.0).floor() as u32
}

/// Two decimals, halves to even: 0.125 → 0.12, 0.375 → 0.38.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_truncates() {
        assert_eq!(score_from_probability(0.999), 99);
        assert_eq!(score_from_probability(0.7),   70);
        assert_eq!(score_from_probability(0.449), 44);
        assert_eq!(score_from_probability(1.0),   100);
        assert_eq!(score_from_probability(-0.2),  0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(-0.876), -0.88);
        assert_eq!(round2(3.0), 3.0);
    }

    #[test]
    fn test_round2_halves_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
        // 2.675 is stored just below the half
        assert_eq!(round2(2.675), 2.67);
    }

    #[test]
    fn test_collateral_ratio_rounds_half_to_even() {
        let loan = crate::domain::loan::LoanRequest::new("0xabc", 1.0, 12, 0.125, 1.0, 1.0)
            .clamp()
            .unwrap();
        assert_eq!(AssessedInputs::from(&loan).collateral_ratio, 0.12);
    }

    #[test]
    fn test_json_field_order() {
        let assessment = RiskAssessment {
            score: 81,
            decision: DecisionBand::Approve,
            explanation: vec![FeatureImpact { feature: "Collateral_Ratio".into(), impact: 1.25 }],
            inputs: AssessedInputs {
                principal: 2.0, tenure: 12, collateral: 3.0, collateral_ratio: 1.5,
            },
        };
        let json = serde_json::to_string(&assessment).unwrap();
        assert_eq!(
            json,
            r#"{"score":81,"decision":"APPROVE","explanation":[{"feature":"Collateral_Ratio","impact":1.25}],"inputs":{"principal":2.0,"tenure":12,"collateral":3.0,"collateral_ratio":1.5}}"#
        );
    }

    #[test]
    fn test_error_report_shape() {
        let json = serde_json::to_string(&ErrorReport::new("Missing arguments")).unwrap();
        assert_eq!(json, r#"{"error":"Missing arguments","score":0}"#);
    }
}
