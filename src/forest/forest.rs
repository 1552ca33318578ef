//! Regression forest training with parallel tree construction.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::forest::config::RandomForestConfig;
use crate::forest::error::ForestError;
use crate::forest::tree::{RegressionTree, TreeParams};

/// A fitted regression forest.
///
/// The feature names the forest was fitted with are part of the model, so
/// importances are always reported against the columns that produced them.
#[derive(Debug, Clone)]
pub struct RandomForest {
    pub(crate) trees: Vec<RegressionTree>,
    pub(crate) feature_names: Vec<String>,
    pub(crate) n_features: usize,
}

impl RandomForest {
    /// Predict one sample as the mean of all tree outputs.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] on a width mismatch.
    pub fn predict(&self, sample: &[f64]) -> Result<f64, ForestError> {
        if sample.len() != self.n_features {
            return Err(ForestError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        let total: f64 = self
            .trees
            .iter()
            .map(|t| t.predict_unchecked(sample))
            .sum();
        Ok(total / self.trees.len() as f64)
    }

    /// Predict many samples in parallel, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ForestError::PredictionFeatureMismatch`] encountered.
    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<f64>, ForestError> {
        samples.par_iter().map(|s| self.predict(s)).collect()
    }

    /// Impurity-based importances, positionally aligned with
    /// [`RandomForest::feature_names`].
    ///
    /// Per-tree importances are summed and normalised to 1.0. All zeros when
    /// no tree made a split.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.n_features];
        for tree in &self.trees {
            for (total, value) in totals.iter_mut().zip(tree.feature_importances()) {
                *total += value;
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|v| *v /= sum);
        }
        totals
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[must_use]
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

/// Draw `n_samples` row indices with replacement.
fn bootstrap_indices(n_samples: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
}

fn validate_data(
    features: &[Vec<f64>],
    targets: &[f64],
    feature_names: &[String],
) -> Result<usize, ForestError> {
    if features.is_empty() {
        return Err(ForestError::EmptyDataset);
    }
    let n_features = features[0].len();
    if n_features == 0 {
        return Err(ForestError::ZeroFeatures);
    }
    if targets.len() != features.len() {
        return Err(ForestError::TargetLengthMismatch {
            samples: features.len(),
            targets: targets.len(),
        });
    }
    if feature_names.len() != n_features {
        return Err(ForestError::NameCountMismatch {
            names: feature_names.len(),
            n_features,
        });
    }
    for (sample_index, (row, &y)) in features.iter().zip(targets).enumerate() {
        if row.len() != n_features {
            return Err(ForestError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
            return Err(ForestError::NonFiniteValue {
                sample_index,
                feature_index: Some(feature_index),
            });
        }
        if !y.is_finite() {
            return Err(ForestError::NonFiniteValue {
                sample_index,
                feature_index: None,
            });
        }
    }
    Ok(n_features)
}

/// Train the forest. Trees are grown in parallel on the current rayon pool.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_samples = features.len()))]
pub(crate) fn train(
    config: &RandomForestConfig,
    features: &[Vec<f64>],
    targets: &[f64],
    feature_names: &[String],
) -> Result<RandomForest, ForestError> {
    let n_features = validate_data(features, targets, feature_names)?;
    let max_features = config.validate(n_features)?;
    let n_samples = features.len();

    let params = TreeParams {
        max_depth: config.max_depth,
        min_samples_split: config.min_samples_split,
        min_samples_leaf: config.min_samples_leaf,
        max_features,
    };

    debug!(
        n_samples,
        n_features,
        max_features,
        bootstrap = config.bootstrap,
        "training regression forest"
    );

    let col_features: Vec<Vec<f64>> = (0..n_features)
        .map(|f| features.iter().map(|row| row[f]).collect())
        .collect();

    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master_rng.gen()).collect();
    let all_indices: Vec<usize> = (0..n_samples).collect();
    let bootstrap = config.bootstrap;

    let trees: Vec<RegressionTree> = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tree_seed = rng.gen();
            if bootstrap {
                let sample = bootstrap_indices(n_samples, &mut rng);
                RegressionTree::grow(&col_features, targets, &sample, &params, tree_seed)
            } else {
                RegressionTree::grow(&col_features, targets, &all_indices, &params, tree_seed)
            }
        })
        .collect();

    debug!(n_trees = trees.len(), "regression forest trained");

    Ok(RandomForest {
        trees,
        feature_names: feature_names.to_vec(),
        n_features,
    })
}
