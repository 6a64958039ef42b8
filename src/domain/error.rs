// ============================================================
// Layer 3 — Input Errors
// ============================================================
// Everything that can be wrong with what the caller typed.
// The CLI prints these as {"error": "<Display text>", "score": 0}
// instead of an assessment, so the Display text is the message
// the caller sees.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Missing arguments")]
    MissingArguments,

    #[error("invalid {field} '{value}': expected {expected}")]
    Unparsable {
        field:    &'static str,
        value:    String,
        expected: &'static str,
    },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
}
