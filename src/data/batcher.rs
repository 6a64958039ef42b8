// ============================================================
// Layer 4 — Loan Batcher
// ============================================================
// Converts scaled feature rows (f64, row-major) into tensors on a
// Burn device:
//
//   features: [n, 5]  float
//   targets:  [n]     float, 1.0 = repaid / 0.0 = defaulted
//
// The trainer is full-batch, so a "batch" is the whole training
// fold; inference batches are a single row.
//
// Reference: Burn Book §4 (Batcher)

use anyhow::{ensure, Result};
use burn::prelude::*;

#[derive(Debug, Clone)]
pub struct LoanBatch<B: Backend> {
    pub features: Tensor<B, 2>,
    pub targets:  Tensor<B, 1>,
}

#[derive(Clone, Debug)]
pub struct LoanBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> LoanBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Stack rows into a [n, width] float tensor.
    pub fn features(&self, rows: &[Vec<f64>]) -> Result<Tensor<B, 2>> {
        ensure!(!rows.is_empty(), "cannot batch zero rows");
        let width = rows[0].len();
        ensure!(rows.iter().all(|r| r.len() == width), "ragged feature rows");

        let flat: Vec<f32> = rows.iter().flat_map(|r| r.iter().map(|&x| x as f32)).collect();
        Ok(Tensor::<B, 2>::from_data(
            TensorData::new(flat, [rows.len(), width]),
            &self.device,
        ))
    }

    pub fn batch(&self, rows: &[Vec<f64>], labels: &[bool]) -> Result<LoanBatch<B>> {
        ensure!(
            rows.len() == labels.len(),
            "{} rows but {} labels",
            rows.len(),
            labels.len()
        );
        let features = self.features(rows)?;
        let targets: Vec<f32> = labels.iter().map(|&y| if y { 1.0 } else { 0.0 }).collect();
        let targets = Tensor::<B, 1>::from_data(
            TensorData::new(targets, [labels.len()]),
            &self.device,
        );
        Ok(LoanBatch { features, targets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let batcher = LoanBatcher::<NdArray>::new(Default::default());
        let rows = vec![vec![0.5; 5], vec![-1.0; 5], vec![2.0; 5]];
        let batch = batcher.batch(&rows, &[true, false, true]).unwrap();
        assert_eq!(batch.features.dims(), [3, 5]);
        assert_eq!(batch.targets.dims(), [3]);
        let targets = batch.targets.into_data().to_vec::<f32>().unwrap();
        assert_eq!(targets, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rejects_mismatched_input() {
        let batcher = LoanBatcher::<NdArray>::new(Default::default());
        assert!(batcher.batch(&[vec![1.0; 5]], &[true, false]).is_err());
        assert!(batcher.features(&[vec![1.0; 5], vec![1.0; 4]]).is_err());
        assert!(batcher.features(&[]).is_err());
    }
}
