// ============================================================
// Layer 4 — Stratified K-Fold
// ============================================================
// Splits sample indices into k (train, test) partitions so that
// every index is in exactly one test fold and every fold keeps
// roughly the overall class ratio.
//
// Deterministic, no shuffling:
//   1. Sort the labels and deal them round-robin into k piles;
//      pile i's per-class counts become fold i's per-class quota.
//   2. Walk each class's members in sample order and hand them
//      out to folds 0, 1, … k−1 according to those quotas.
//
// The calibrator fitted on each test fold needs both classes,
// so every class must have at least k members.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldError {
    #[error("need at least 2 folds, got {0}")]
    TooFewFolds(usize),

    #[error("class {label} has {count} samples, fewer than {folds} folds")]
    ClassTooSmall { label: bool, count: usize, folds: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

pub fn stratified_folds(labels: &[bool], k: usize) -> Result<Vec<Fold>, FoldError> {
    if k < 2 {
        return Err(FoldError::TooFewFolds(k));
    }

    let class_counts = [
        labels.iter().filter(|&&y| !y).count(),
        labels.iter().filter(|&&y| y).count(),
    ];
    for (class, &count) in class_counts.iter().enumerate() {
        if count < k {
            return Err(FoldError::ClassTooSmall { label: class == 1, count, folds: k });
        }
    }

    // Step 1: sorted labels are [0; n0] ++ [1; n1]; deal them round-robin.
    let mut quota = vec![[0usize; 2]; k];
    for pos in 0..labels.len() {
        let class = usize::from(pos >= class_counts[0]);
        quota[pos % k][class] += 1;
    }

    // Step 2: hand each class's members out in sample order.
    let mut test_fold = vec![0usize; labels.len()];
    for class in 0..2 {
        let mut assignments = (0..k).flat_map(|fold| std::iter::repeat(fold).take(quota[fold][class]));
        for (idx, &y) in labels.iter().enumerate() {
            if usize::from(y) == class {
                // quotas for a class sum to its member count
                test_fold[idx] = assignments.next().unwrap_or(k - 1);
            }
        }
    }

    Ok((0..k)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..labels.len()).partition(|&i| test_fold[i] == fold);
            Fold { train, test }
        })
        .collect())
}
