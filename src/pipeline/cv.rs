//! K-fold splitting for cross-validated scoring.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::pipeline::error::{PipelineError, Result};

/// One rotation of the k-fold scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldSplit {
    pub fold: usize,
    pub train_indices: Vec<usize>,
    pub validation_indices: Vec<usize>,
}

/// Split `n_samples` rows into `n_folds` validation slices.
///
/// The first `n_samples % n_folds` folds get one extra row. Without a
/// shuffle RNG, folds are contiguous blocks in row order.
pub fn k_fold<R: Rng + ?Sized>(
    n_samples: usize,
    n_folds: usize,
    shuffle: Option<&mut R>,
) -> Result<Vec<FoldSplit>> {
    if n_folds < 2 {
        return Err(PipelineError::InvalidFoldCount { folds: n_folds });
    }
    if n_samples < n_folds {
        return Err(PipelineError::TooFewSamplesForFolds {
            samples: n_samples,
            folds: n_folds,
        });
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    if let Some(rng) = shuffle {
        indices.shuffle(rng);
    }

    let base = n_samples / n_folds;
    let remainder = n_samples % n_folds;

    let mut splits = Vec::with_capacity(n_folds);
    let mut start = 0;
    for fold in 0..n_folds {
        let size = if fold < remainder { base + 1 } else { base };
        let end = start + size;
        let validation_indices = indices[start..end].to_vec();
        let train_indices: Vec<usize> = indices[..start]
            .iter()
            .chain(indices[end..].iter())
            .copied()
            .collect();
        splits.push(FoldSplit {
            fold,
            train_indices,
            validation_indices,
        });
        start = end;
    }

    Ok(splits)
}
