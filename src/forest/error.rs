//! Error types for regression forest configuration, training and prediction.

/// Errors from regression forest operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForestError {
    /// Returned when n_trees is zero.
    #[error("n_estimators must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid tree count.
        n_trees: usize,
    },

    /// Returned when max_depth is `Some(0)`.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid depth limit.
        max_depth: usize,
    },

    /// Returned when min_samples_split is less than 2.
    #[error("min_samples_split must be at least 2, got {min_samples_split}")]
    InvalidMinSamplesSplit {
        /// The invalid min_samples_split value.
        min_samples_split: usize,
    },

    /// Returned when min_samples_leaf is zero.
    #[error("min_samples_leaf must be at least 1, got {min_samples_leaf}")]
    InvalidMinSamplesLeaf {
        /// The invalid min_samples_leaf value.
        min_samples_leaf: usize,
    },

    /// Returned when max_features resolves to 0 or exceeds n_features.
    #[error("max_features resolved to {max_features}, but must be in [1, {n_features}]")]
    InvalidMaxFeatures {
        /// The resolved feature count.
        max_features: usize,
        /// The number of features in the dataset.
        n_features: usize,
    },

    /// Returned when the training dataset has zero samples.
    #[error("training dataset has zero samples")]
    EmptyDataset,

    /// Returned when the training dataset has zero feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when a sample row has a different width than the first row.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the sample.
        got: usize,
        /// Zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when the target vector length differs from the sample count.
    #[error("got {targets} targets for {samples} samples")]
    TargetLengthMismatch {
        /// Number of feature rows.
        samples: usize,
        /// Number of target values.
        targets: usize,
    },

    /// Returned when the number of feature names differs from the row width.
    #[error("got {names} feature names for {n_features} feature columns")]
    NameCountMismatch {
        /// Number of supplied names.
        names: usize,
        /// Number of feature columns.
        n_features: usize,
    },

    /// Returned when a feature or target value is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, feature {feature_index:?}")]
    NonFiniteValue {
        /// Zero-based index of the offending sample.
        sample_index: usize,
        /// Zero-based feature column, or `None` for the target.
        feature_index: Option<usize>,
    },

    /// Returned when a prediction input has the wrong number of features.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The number of features the forest was fitted with.
        expected: usize,
        /// The number of features in the prediction input.
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_tree_count_display() {
        let err = ForestError::InvalidTreeCount { n_trees: 0 };
        assert_eq!(err.to_string(), "n_estimators must be at least 1, got 0");
    }

    #[test]
    fn test_max_features_display() {
        let err = ForestError::InvalidMaxFeatures {
            max_features: 9,
            n_features: 4,
        };
        assert_eq!(
            err.to_string(),
            "max_features resolved to 9, but must be in [1, 4]"
        );
    }

    #[test]
    fn test_target_non_finite_display() {
        let err = ForestError::NonFiniteValue {
            sample_index: 3,
            feature_index: None,
        };
        assert_eq!(
            err.to_string(),
            "non-finite value at sample 3, feature None"
        );
    }
}
