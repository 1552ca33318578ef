//! Random train/test partitioning of the feature matrix and target.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::pipeline::error::{PipelineError, Result};
use crate::pipeline::features::FeatureMatrix;

/// Disjoint, exhaustive train/test partition of (X, y).
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: FeatureMatrix,
    pub x_test: FeatureMatrix,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
    /// Source row of every training sample, ascending.
    pub train_indices: Vec<usize>,
    /// Source row of every test sample, ascending.
    pub test_indices: Vec<usize>,
}

/// Number of rows held out for a given fraction, rounded up.
pub fn test_size(n_rows: usize, test_fraction: f64) -> usize {
    ((n_rows as f64) * test_fraction).ceil() as usize
}

/// Partition rows into training and held-out sets.
///
/// The rows are permuted with `rng` and the first `ceil(test_fraction * n)`
/// positions are held out. The same RNG state always produces the same
/// split. A fraction of 0 leaves the test set empty.
///
/// # Errors
///
/// [`PipelineError::InvalidTestFraction`] when the fraction is outside `[0, 1)`,
/// [`PipelineError::LengthMismatch`] when `x` and `y` differ in length.
pub fn train_test_split<R: Rng + ?Sized>(
    x: &FeatureMatrix,
    y: &[f64],
    test_fraction: f64,
    rng: &mut R,
) -> Result<TrainTestSplit> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(PipelineError::InvalidTestFraction {
            fraction: test_fraction,
        });
    }
    if x.n_rows() != y.len() {
        return Err(PipelineError::LengthMismatch {
            predictions: x.n_rows(),
            actual: y.len(),
        });
    }

    let n_rows = y.len();
    let n_test = test_size(n_rows, test_fraction);

    let mut permutation: Vec<usize> = (0..n_rows).collect();
    permutation.shuffle(rng);

    let mut test_indices = permutation[..n_test].to_vec();
    let mut train_indices = permutation[n_test..].to_vec();
    test_indices.sort_unstable();
    train_indices.sort_unstable();

    Ok(TrainTestSplit {
        x_train: x.select(&train_indices),
        x_test: x.select(&test_indices),
        y_train: train_indices.iter().map(|&i| y[i]).collect(),
        y_test: test_indices.iter().map(|&i| y[i]).collect(),
        train_indices,
        test_indices,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn matrix(n: usize) -> (FeatureMatrix, Vec<f64>) {
        let rows = (0..n).map(|i| vec![i as f64]).collect();
        let x = FeatureMatrix::new(vec!["depth".to_string()], rows).unwrap();
        let y = (0..n).map(|i| 100.0 + i as f64).collect();
        (x, y)
    }

    #[test]
    fn test_size_rounds_up() {
        assert_eq!(test_size(250, 0.01), 3);
        assert_eq!(test_size(100, 0.01), 1);
        assert_eq!(test_size(100, 0.0), 0);
    }

    #[test]
    fn test_rows_stay_aligned() {
        let (x, y) = matrix(40);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let split = train_test_split(&x, &y, 0.25, &mut rng).unwrap();
        for (row, target) in split.x_test.rows().iter().zip(&split.y_test) {
            assert_eq!(row[0] + 100.0, *target);
        }
        assert_eq!(split.x_test.n_rows(), 10);
    }

    #[test]
    fn test_fraction_of_one_rejected() {
        let (x, y) = matrix(5);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(matches!(
            train_test_split(&x, &y, 1.0, &mut rng),
            Err(PipelineError::InvalidTestFraction { .. })
        ));
        assert!(train_test_split(&x, &y, -0.1, &mut rng).is_err());
    }
}
