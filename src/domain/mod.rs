// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits that define the core
// concepts of the scorer.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Keeping it pure means the clamping rules, decision bands and
// output shape are unit-testable without a model on disk.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Caller-supplied loan parameters and the clamped feature row
pub mod loan;

/// APPROVE / MANUAL_REVIEW / REJECT thresholds
pub mod decision;

/// The JSON-serialisable scoring result
pub mod assessment;

/// Typed input errors rendered by the CLI
pub mod error;

/// Seams between the predictor and the fitted model
pub mod traits;
