// ============================================================
// Layer 3 — Decision Band
// ============================================================
// Maps the 0–100 risk score onto the action a loan officer takes.
//
//   score >= 70  → APPROVE
//   score >= 45  → MANUAL_REVIEW
//   otherwise    → REJECT

use serde::{Deserialize, Serialize};
use std::fmt;

pub const APPROVE_THRESHOLD: u32 = 70;
pub const MANUAL_REVIEW_THRESHOLD: u32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionBand {
    Approve,
    ManualReview,
    Reject,
}

impl DecisionBand {
    pub fn from_score(score: u32) -> Self {
        if score >= APPROVE_THRESHOLD {
            DecisionBand::Approve
        } else if score >= MANUAL_REVIEW_THRESHOLD {
            DecisionBand::ManualReview
        } else {
            DecisionBand::Reject
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionBand::Approve      => "APPROVE",
            DecisionBand::ManualReview => "MANUAL_REVIEW",
            DecisionBand::Reject       => "REJECT",
        }
    }
}

impl fmt::Display for DecisionBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
