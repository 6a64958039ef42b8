// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, hands off to Layer 2, and prints
// JSON on stdout. Logs go to stderr, so stdout is always exactly
// one JSON document.
//
// Two entry points:
//   1. `credit-risk <borrower> <principal> ...` — load (or train)
//      the model, print an assessment
//   2. `credit-risk train` — force a fresh fit, print the summary
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use crate::application::{
    score_use_case::{ScoreConfig, ScoreUseCase},
    train_use_case::{TrainConfig, TrainUseCase},
};
use crate::domain::{assessment::ErrorReport, loan::LoanRequest, traits::RiskScorer};
use commands::{Commands, ScoreArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "credit-risk",
    version,
    about = "Score loans with a calibrated logistic-regression model.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Directory holding the trained model artifacts
    #[arg(long, global = true, env = "CREDIT_RISK_MODEL_DIR", default_value = "risk_model")]
    pub model_dir: PathBuf,

    /// Ignore saved artifacts and fit a new model before scoring
    #[arg(long, global = true)]
    pub retrain: bool,

    #[command(flatten)]
    pub score: ScoreArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match &self.command {
            Some(Commands::Train(args)) => self.run_train(args),
            None => self.run_score(&self.score),
        }
    }

    /// Input problems are reported as JSON and are not a process
    /// failure; callers read the verdict from stdout. Anything that
    /// goes wrong after that is also reported as JSON, then returned.
    fn run_score(&self, args: &ScoreArgs) -> Result<()> {
        let request = match LoanRequest::try_from(args) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("Input error: {e}");
                return print_json(&ErrorReport::new(e.to_string()));
            }
        };

        let cfg = ScoreConfig {
            model_dir: self.model_dir.clone(),
            retrain:   self.retrain,
            train:     TrainConfig::default(),
        };

        match ScoreUseCase::load_or_train(&cfg).and_then(|scorer| scorer.assess(&request)) {
            Ok(assessment) => print_json(&assessment),
            Err(e) => {
                tracing::error!("Scoring failed: {e:#}");
                print_json(&ErrorReport::new(format!("{e:#}")))?;
                Err(e)
            }
        }
    }

    fn run_train(&self, args: &TrainArgs) -> Result<()> {
        tracing::info!("Training into '{}'", self.model_dir.display());
        let trained = TrainUseCase::new(args.into(), &self.model_dir).execute()?;
        print_json(&trained.summary)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("credit-risk").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_positional_values_are_the_default_form() {
        let cli = parse(&["0xabc", "1.5", "12", "2", "3000", "250000"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.score.values.len(), 6);
        assert_eq!(cli.model_dir, PathBuf::from("risk_model"));
    }

    #[test]
    fn test_no_arguments_still_parse() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert!(cli.score.values.is_empty());
    }

    #[test]
    fn test_flag_like_values_reach_the_request() {
        let cli = parse(&["0xabc", "-abc", "12", "2", "1", "1"]);
        assert_eq!(cli.score.values[1], "-abc");

        let cli = parse(&["--retrain", "0xabc", "-1", "-3", "2", "1", "1"]);
        assert!(cli.retrain);
        assert_eq!(cli.score.values, vec!["0xabc", "-1", "-3", "2", "1", "1"]);
    }

    #[test]
    fn test_train_subcommand() {
        let cli = parse(&["--model-dir", "elsewhere", "train", "--samples", "200"]);
        match cli.command {
            Some(Commands::Train(ref a)) => assert_eq!(a.samples, 200),
            None => panic!("expected train"),
        }
        assert_eq!(cli.model_dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_bad_request_never_touches_the_model_dir() {
        let dir = tempfile::tempdir().unwrap();
        let model_dir = dir.path().join("model");
        let model_dir_arg = model_dir.to_str().unwrap();

        parse(&["--model-dir", model_dir_arg, "0xabc", "lots", "12", "2", "1", "1"]).run().unwrap();
        parse(&["--model-dir", model_dir_arg, "0xabc"]).run().unwrap();

        assert!(!model_dir.join("manifest.json").exists());
        assert!(!model_dir.exists());
    }
}
