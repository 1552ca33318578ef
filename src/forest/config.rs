//! Configuration builder for regression forest training.

use std::fmt;

use serde::Serialize;

use crate::forest::error::ForestError;
use crate::forest::forest::RandomForest;

/// Strategy for determining the number of features considered at each split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxFeatures {
    /// Every feature is a split candidate (the regression default).
    Auto,
    /// Square root of total features, rounded up.
    Sqrt,
    /// Log base 2 of total features, rounded up.
    Log2,
    /// A fraction of total features, rounded up. Must be in (0.0, 1.0].
    Fraction(f64),
    /// A fixed count.
    Fixed(usize),
}

impl MaxFeatures {
    /// Resolve the strategy to a concrete feature count.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidMaxFeatures`] when the resolved count is
    /// zero or larger than `n_features`.
    pub fn resolve(self, n_features: usize) -> Result<usize, ForestError> {
        let resolved = match self {
            MaxFeatures::Auto => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().ceil().max(1.0) as usize,
            MaxFeatures::Fraction(f) if f > 0.0 && f <= 1.0 => {
                (n_features as f64 * f).ceil() as usize
            }
            MaxFeatures::Fraction(_) => 0,
            MaxFeatures::Fixed(n) => n,
        };
        if resolved == 0 || resolved > n_features {
            return Err(ForestError::InvalidMaxFeatures {
                max_features: resolved,
                n_features,
            });
        }
        Ok(resolved)
    }
}

impl fmt::Display for MaxFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxFeatures::Auto => write!(f, "auto"),
            MaxFeatures::Sqrt => write!(f, "sqrt"),
            MaxFeatures::Log2 => write!(f, "log2"),
            MaxFeatures::Fraction(v) => write!(f, "{}", v),
            MaxFeatures::Fixed(n) => write!(f, "{}", n),
        }
    }
}

/// Configuration for regression forest training.
///
/// Construct via [`RandomForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default |
/// |---------------------|---------|
/// | `max_features`      | `Auto`  |
/// | `max_depth`         | `None`  |
/// | `min_samples_split` | 2       |
/// | `min_samples_leaf`  | 1       |
/// | `bootstrap`         | `true`  |
/// | `seed`              | 42      |
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) max_features: MaxFeatures,
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) bootstrap: bool,
    pub(crate) seed: u64,
}

impl RandomForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, ForestError> {
        if n_trees == 0 {
            return Err(ForestError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            max_features: MaxFeatures::Auto,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
            seed: 42,
        })
    }

    /// Set the max features strategy.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the maximum tree depth. `None` means unlimited.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum number of samples required in each leaf after a split.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Draw a bootstrap sample per tree (`true`) or train every tree on all rows.
    #[must_use]
    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    #[must_use]
    pub fn max_features(&self) -> MaxFeatures {
        self.max_features
    }

    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    #[must_use]
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    #[must_use]
    pub fn min_samples_leaf(&self) -> usize {
        self.min_samples_leaf
    }

    #[must_use]
    pub fn bootstrap(&self) -> bool {
        self.bootstrap
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Check that this configuration can be fitted on data with `n_features`
    /// columns, returning the resolved max-features count.
    ///
    /// # Errors
    ///
    /// | Variant                                  | When                                      |
    /// |------------------------------------------|-------------------------------------------|
    /// | [`ForestError::InvalidTreeCount`]        | `n_trees` is zero                         |
    /// | [`ForestError::InvalidMaxDepth`]         | `max_depth` is `Some(0)`                  |
    /// | [`ForestError::InvalidMinSamplesSplit`]  | `min_samples_split` < 2                   |
    /// | [`ForestError::InvalidMinSamplesLeaf`]   | `min_samples_leaf` < 1                    |
    /// | [`ForestError::InvalidMaxFeatures`]      | resolved outside `[1, n_features]`        |
    pub fn validate(&self, n_features: usize) -> Result<usize, ForestError> {
        if self.n_trees == 0 {
            return Err(ForestError::InvalidTreeCount { n_trees: 0 });
        }
        if self.max_depth == Some(0) {
            return Err(ForestError::InvalidMaxDepth { max_depth: 0 });
        }
        if self.min_samples_split < 2 {
            return Err(ForestError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }
        if self.min_samples_leaf < 1 {
            return Err(ForestError::InvalidMinSamplesLeaf {
                min_samples_leaf: self.min_samples_leaf,
            });
        }
        self.max_features.resolve(n_features)
    }

    /// Train a regression forest.
    ///
    /// `features[sample_idx][feature_idx]` is row-major, `targets[sample_idx]`
    /// the response and `feature_names` labels each column. The names are
    /// stored in the fitted forest so importances never need re-labelling.
    ///
    /// # Errors
    ///
    /// Any configuration error from [`RandomForestConfig::validate`], plus
    /// [`ForestError::EmptyDataset`], [`ForestError::ZeroFeatures`],
    /// [`ForestError::FeatureCountMismatch`], [`ForestError::TargetLengthMismatch`],
    /// [`ForestError::NameCountMismatch`] and [`ForestError::NonFiniteValue`].
    pub fn fit(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        feature_names: &[String],
    ) -> Result<RandomForest, ForestError> {
        crate::forest::forest::train(self, features, targets, feature_names)
    }
}
