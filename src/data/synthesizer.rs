// ============================================================
// Layer 4 — Loan Data Synthesizer
// ============================================================
// There is no labelled loan book to learn from, so training data
// is generated from a hand-tuned linear rule plus Gaussian noise:
//
//   base = 0.8·income + 0.8·credit + 3.5·collateral_ratio
//        − 0.5·principal − 0.05·tenure + N(0, σ)
//   repaid = base > threshold
//
// Each feature column is drawn in full before the next one, from
// a single seeded StdRng, so the same seed always yields the same
// dataset.
//
// Reference: rand / rand_distr crate documentation

use anyhow::{anyhow, ensure, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::data::dataset::LoanRecord;
use crate::domain::loan::FEATURE_COUNT;

/// Weights of the labelling rule, in FEATURE_NAMES order.
pub const RULE_WEIGHTS: [f64; FEATURE_COUNT] = [0.8, 0.8, -0.5, -0.05, 3.5];

pub struct LoanSynthesizer {
    seed:      u64,
    noise_std: f64,
    threshold: f64,
}

impl LoanSynthesizer {
    pub fn new(seed: u64, noise_std: f64, threshold: f64) -> Self {
        Self { seed, noise_std, threshold }
    }

    /// Generate `n_samples` labelled records.
    pub fn generate(&self, n_samples: usize) -> Result<Vec<LoanRecord>> {
        ensure!(n_samples > 0, "cannot synthesise an empty dataset");

        let mut rng = StdRng::seed_from_u64(self.seed);
        let noise = Normal::new(0.0, self.noise_std)
            .map_err(|e| anyhow!("invalid noise std {}: {e}", self.noise_std))?;

        let income:     Vec<f64> = (0..n_samples).map(|_| rng.gen_range(1..=10u32) as f64).collect();
        let credit:     Vec<f64> = (0..n_samples).map(|_| rng.gen_range(1..=10u32) as f64).collect();
        let principal:  Vec<f64> = (0..n_samples).map(|_| rng.gen_range(0.1..5.0)).collect();
        let tenure:     Vec<f64> = (0..n_samples).map(|_| rng.gen_range(3..=36u32) as f64).collect();
        let collateral: Vec<f64> = (0..n_samples).map(|_| rng.gen_range(0.1..2.0)).collect();

        let records = (0..n_samples)
            .map(|i| {
                let features = [income[i], credit[i], principal[i], tenure[i], collateral[i]];
                let base = rule_score(&features) + noise.sample(&mut rng);
                LoanRecord::new(features, base > self.threshold)
            })
            .collect();

        Ok(records)
    }
}

/// The noiseless linear labelling rule.
pub fn rule_score(features: &[f64; FEATURE_COUNT]) -> f64 {
    features.iter().zip(RULE_WEIGHTS.iter()).map(|(x, w)| x * w).sum()
}
