use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::loan::FEATURE_COUNT;

/// One labelled borrower. Features are unscaled, in FEATURE_NAMES order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub features: [f64; FEATURE_COUNT],
    pub repaid:   bool,
}

impl LoanRecord {
    pub fn new(features: [f64; FEATURE_COUNT], repaid: bool) -> Self {
        Self { features, repaid }
    }
}

pub struct LoanDataset {
    records: Vec<LoanRecord>,
}

impl LoanDataset {
    pub fn new(records: Vec<LoanRecord>) -> Self { Self { records } }

    pub fn feature_rows(&self) -> Vec<Vec<f64>> {
        self.records.iter().map(|r| r.features.to_vec()).collect()
    }

    pub fn labels(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.repaid).collect()
    }

    pub fn positive_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.records.iter().filter(|r| r.repaid).count() as f64 / self.records.len() as f64
    }
}

impl Dataset<LoanRecord> for LoanDataset {
    fn get(&self, index: usize) -> Option<LoanRecord> {
        self.records.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
