// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong to any one business
// layer:
//
//   checkpoint.rs — ArtifactStore: saves the fold ensemble (Burn
//                   records), the scaler and a JSON manifest, and
//                   validates them on load
//
//   metrics.rs    — per-fold held-out metrics, CSV logging and
//                   the fold-averaged training summary
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model artifact saving, loading and validation
pub mod checkpoint;

/// Training metrics and CSV logger
pub mod metrics;
