// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between "no data at all" and the tensors the
// trainer consumes.
//
//   LoanSynthesizer   → seeded synthetic borrowers + repayment label
//       │
//       ▼
//   LoanDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   StandardScaler    → per-column (x - mean) / std
//       │
//       ▼
//   stratified_folds  → k (train, test) index partitions
//       │
//       ▼
//   LoanBatcher       → stacks rows into [n, 5] / [n] tensors
//
// Reference: Burn Book §4 (Datasets)

/// Seeded synthetic loan records
pub mod synthesizer;

/// LoanRecord and Burn's Dataset trait
pub mod dataset;

/// Feature standardisation, persisted beside the model
pub mod scaler;

/// Deterministic stratified K-fold partitions
pub mod folds;

/// Rows → tensors on a given device
pub mod batcher;
