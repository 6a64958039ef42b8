// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Scoring is the top-level form: `credit-risk <values...>`.
// `train` is the only subcommand.
//
// Loan values are taken as raw strings and converted here
// instead of by clap. A missing or malformed value (even one
// that looks like a flag, e.g. `-abc`) must still produce the
// JSON error object on stdout ({"error": ..., "score": 0}),
// not clap's usage text.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::str::FromStr;

use crate::application::train_use_case::TrainConfig;
use crate::domain::{error::InputError, loan::LoanRequest};

/// Number of loan values scoring cannot do without.
pub const REQUIRED_SCORE_ARGS: usize = 6;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit a fresh model on synthetic data and save it
    Train(TrainArgs),
}

/// Positional values, in order:
///   borrower principal tenure collateral eth_price_usd eth_price_inr [income_score] [credit_score]
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// borrower principal tenure collateral eth_usd eth_inr [income] [credit]
    #[arg(value_name = "VALUES", num_args = 0.., allow_hyphen_values = true)]
    pub values: Vec<String>,
}

impl TryFrom<&ScoreArgs> for LoanRequest {
    type Error = InputError;

    fn try_from(args: &ScoreArgs) -> Result<Self, Self::Error> {
        let v = &args.values;
        if v.len() < REQUIRED_SCORE_ARGS {
            return Err(InputError::MissingArguments);
        }

        let request = LoanRequest::new(
            v[0].clone(),
            parse(&v[1], "principal", "a number")?,
            parse(&v[2], "tenure", "an integer")?,
            parse(&v[3], "collateral", "a number")?,
            parse(&v[4], "eth_price_usd", "a number")?,
            parse(&v[5], "eth_price_inr", "a number")?,
        );

        let income = match v.get(6) {
            Some(s) => parse(s, "income_score", "an integer")?,
            None => request.income_score,
        };
        let credit = match v.get(7) {
            Some(s) => parse(s, "credit_score", "an integer")?,
            None => request.credit_score,
        };

        Ok(request.with_scores(income, credit))
    }
}

fn parse<T: FromStr>(raw: &str, field: &'static str, expected: &'static str) -> Result<T, InputError> {
    raw.trim().parse().map_err(|_| InputError::Unparsable {
        field,
        value: raw.to_string(),
        expected,
    })
}

/// Hyperparameters for `train`. Defaults match TrainConfig::default().
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Number of synthetic loan records
    #[arg(long, default_value_t = 1000)]
    pub samples: usize,

    /// RNG seed for the synthetic data
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Cross-validation folds (one calibrated estimator per fold)
    #[arg(long, default_value_t = 5)]
    pub folds: usize,

    /// Inverse L2 regularisation strength
    #[arg(long, default_value_t = 1.0)]
    pub inverse_regularization: f64,

    /// Adam learning rate
    #[arg(long, default_value_t = 0.05)]
    pub lr: f64,

    /// Maximum full-batch optimiser steps per fold
    #[arg(long, default_value_t = 1000)]
    pub max_iter: usize,
}

/// The application layer never sees clap types.
impl From<&TrainArgs> for TrainConfig {
    fn from(a: &TrainArgs) -> Self {
        TrainConfig {
            samples:                a.samples,
            seed:                   a.seed,
            folds:                  a.folds,
            inverse_regularization: a.inverse_regularization,
            learning_rate:          a.lr,
            max_iter:               a.max_iter,
            ..TrainConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> ScoreArgs {
        ScoreArgs { values: values.iter().map(|s| s.to_string()).collect() }
    }

    #[test]
    fn test_six_values_use_default_scores() {
        let r = LoanRequest::try_from(&args(&["0xabc", "1.5", "12", "2", "3000", "250000"])).unwrap();
        assert_eq!(r, LoanRequest::new("0xabc", 1.5, 12, 2.0, 3000.0, 250000.0));
        assert_eq!((r.income_score, r.credit_score), (5, 5));
    }

    #[test]
    fn test_optional_scores_and_extra_values() {
        let r = LoanRequest::try_from(&args(&["0xabc", "1", "6", "1", "1", "1", "8", "3", "ignored"])).unwrap();
        assert_eq!((r.income_score, r.credit_score), (8, 3));

        let r = LoanRequest::try_from(&args(&["0xabc", "1", "6", "1", "1", "1", "9"])).unwrap();
        assert_eq!((r.income_score, r.credit_score), (9, 5));
    }

    #[test]
    fn test_missing_arguments() {
        let err = LoanRequest::try_from(&args(&["0xabc", "1", "6", "1", "1"])).unwrap_err();
        assert_eq!(err, InputError::MissingArguments);
        assert_eq!(err.to_string(), "Missing arguments");
    }

    #[test]
    fn test_unparsable_values() {
        let err = LoanRequest::try_from(&args(&["0xabc", "lots", "6", "1", "1", "1"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid principal 'lots': expected a number");

        // tenure must be an integer
        let err = LoanRequest::try_from(&args(&["0xabc", "1", "6.5", "1", "1", "1"])).unwrap_err();
        assert!(matches!(err, InputError::Unparsable { field: "tenure", .. }));
    }

    #[test]
    fn test_negative_values_parse() {
        let r = LoanRequest::try_from(&args(&["0xabc", "-1", "-3", "1", "1", "1"])).unwrap();
        assert_eq!(r.principal, -1.0);
        assert_eq!(r.tenure, -3);
    }

    #[test]
    fn test_flag_like_value_is_unparsable() {
        let err = LoanRequest::try_from(&args(&["0xabc", "-abc", "12", "2", "1", "1"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid principal '-abc': expected a number");
    }

    #[test]
    fn test_train_args_into_config() {
        let a = TrainArgs {
            samples: 200, seed: 7, folds: 3, inverse_regularization: 0.5, lr: 0.2, max_iter: 50,
        };
        let cfg = TrainConfig::from(&a);
        assert_eq!(cfg.samples, 200);
        assert_eq!(cfg.folds, 3);
        assert_eq!(cfg.noise_std, TrainConfig::default().noise_std);
    }
}
