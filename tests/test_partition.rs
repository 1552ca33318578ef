//! Tests for the train/test partition

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wellcast::pipeline::train_test_split;

#[path = "common/mod.rs"]
mod common;

use common::create_linear_matrix;

#[test]
fn test_partition_is_disjoint_and_exhaustive() {
    let (x, y) = create_linear_matrix(137);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let split = train_test_split(&x, &y, 0.2, &mut rng).unwrap();

    let train: HashSet<usize> = split.train_indices.iter().copied().collect();
    let test: HashSet<usize> = split.test_indices.iter().copied().collect();
    assert!(train.is_disjoint(&test));
    assert_eq!(train.len() + test.len(), 137);
    assert_eq!(train.len(), split.train_indices.len());
    assert_eq!(test.len(), 28);
    assert_eq!(split.x_train.names(), x.names());
    assert_eq!(split.x_test.names(), x.names());
}

#[test]
fn test_partition_is_deterministic() {
    let (x, y) = create_linear_matrix(80);
    let a = train_test_split(&x, &y, 0.1, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
    let b = train_test_split(&x, &y, 0.1, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
    let c = train_test_split(&x, &y, 0.1, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();

    assert_eq!(a.test_indices, b.test_indices);
    assert_eq!(a.y_train, b.y_train);
    assert_ne!(a.test_indices, c.test_indices);
}

#[test]
fn test_zero_fraction_keeps_everything_for_training() {
    let (x, y) = create_linear_matrix(50);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let split = train_test_split(&x, &y, 0.0, &mut rng).unwrap();

    assert!(split.x_test.is_empty());
    assert!(split.y_test.is_empty());
    assert_eq!(split.x_train.rows(), x.rows());
    assert_eq!(split.y_train, y);
}

#[test]
fn test_default_fraction_holds_out_one_percent() {
    let (x, y) = create_linear_matrix(250);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let split = train_test_split(&x, &y, 0.01, &mut rng).unwrap();
    assert_eq!(split.test_indices.len(), 3);
    assert_eq!(split.train_indices.len(), 247);
}
