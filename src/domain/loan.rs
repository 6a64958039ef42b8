// ============================================================
// Layer 3 — Loan Request Domain Type
// ============================================================
// A LoanRequest is exactly what the caller typed on the command
// line. Before it reaches the model it goes through `clamp()`,
// which pins every value into the range the model was trained
// on and derives the collateral ratio feature.
//
// Feature order is fixed everywhere in the crate:
//   Income_Score, Credit_History, Principal_Eth,
//   Tenure_Months, Collateral_Ratio
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

use crate::domain::error::InputError;

/// Column names, in model input order.
pub const FEATURE_NAMES: [&str; 5] = [
    "Income_Score",
    "Credit_History",
    "Principal_Eth",
    "Tenure_Months",
    "Collateral_Ratio",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Income and credit scores used when the caller omits them.
pub const DEFAULT_BORROWER_SCORE: i64 = 5;

const PRINCIPAL_RANGE:  (f64, f64) = (0.01, 100.0);
const TENURE_RANGE:     (i64, i64) = (1, 60);
const COLLATERAL_RANGE: (f64, f64) = (0.0, 200.0);
const SCORE_RANGE:      (i64, i64) = (1, 10);

/// Raw scoring request, before validation.
///
/// The borrower address and ETH prices are carried for logging;
/// they are not model inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub borrower:      String,
    pub principal:     f64,
    pub tenure:        i64,
    pub collateral:    f64,
    pub eth_price_usd: f64,
    pub eth_price_inr: f64,
    pub income_score:  i64,
    pub credit_score:  i64,
}

impl LoanRequest {
    pub fn new(
        borrower:      impl Into<String>,
        principal:     f64,
        tenure:        i64,
        collateral:    f64,
        eth_price_usd: f64,
        eth_price_inr: f64,
    ) -> Self {
        Self {
            borrower: borrower.into(),
            principal,
            tenure,
            collateral,
            eth_price_usd,
            eth_price_inr,
            income_score: DEFAULT_BORROWER_SCORE,
            credit_score: DEFAULT_BORROWER_SCORE,
        }
    }

    pub fn with_scores(mut self, income_score: i64, credit_score: i64) -> Self {
        self.income_score = income_score;
        self.credit_score = credit_score;
        self
    }

    /// Validate and clamp every model input into its safe range.
    ///
    /// Out-of-range values are pinned, never rejected. Only NaN and
    /// infinities are errors, since there is no sane value to pin
    /// them to.
    pub fn clamp(&self) -> Result<ClampedLoan, InputError> {
        let principal  = finite("principal", self.principal)?;
        let collateral = finite("collateral", self.collateral)?;
        finite("eth_price_usd", self.eth_price_usd)?;
        finite("eth_price_inr", self.eth_price_inr)?;

        Ok(ClampedLoan {
            principal:    principal.clamp(PRINCIPAL_RANGE.0, PRINCIPAL_RANGE.1),
            tenure:       self.tenure.clamp(TENURE_RANGE.0, TENURE_RANGE.1) as u32,
            collateral:   collateral.clamp(COLLATERAL_RANGE.0, COLLATERAL_RANGE.1),
            income_score: self.income_score.clamp(SCORE_RANGE.0, SCORE_RANGE.1) as u32,
            credit_score: self.credit_score.clamp(SCORE_RANGE.0, SCORE_RANGE.1) as u32,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NonFinite { field })
    }
}

/// A request whose values are guaranteed to be inside the trained range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampedLoan {
    pub principal:    f64,
    pub tenure:       u32,
    pub collateral:   f64,
    pub income_score: u32,
    pub credit_score: u32,
}

impl ClampedLoan {
    /// Collateral divided by principal; 0 for a non-positive principal.
    pub fn collateral_ratio(&self) -> f64 {
        if self.principal > 0.0 {
            self.collateral / self.principal
        } else {
            0.0
        }
    }

    /// The unscaled model input row, in FEATURE_NAMES order.
    pub fn feature_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.income_score as f64,
            self.credit_score as f64,
            self.principal,
            self.tenure as f64,
            self.collateral_ratio(),
        ]
    }
}
