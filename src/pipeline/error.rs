//! Error taxonomy for the well-production modelling pipeline.
//!
//! Every variant is fatal to a run: the binary prints it and exits non-zero.

use std::path::PathBuf;

use polars::prelude::PolarsError;

use crate::forest::ForestError;

/// Errors raised by the pipeline stages.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Input file does not exist.
    #[error("Input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Input file extension is not a supported tabular format.
    #[error("Unsupported file format: '{extension}'. Supported formats: csv, parquet")]
    UnsupportedFormat { extension: String },

    /// Rows could not be parsed (ragged column counts, unparsable cells).
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    /// The named target column is absent from the dataset.
    #[error("Target column '{column}' not found in dataset. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// The target column is not numeric.
    #[error("Target column '{column}' must be numeric, found {dtype}")]
    NonNumericTarget { column: String, dtype: String },

    /// A cell holds a missing value; the input is expected to be pre-cleaned.
    #[error("Column '{column}' has a missing value at row {row}")]
    MissingValue { column: String, row: usize },

    /// Two encoded features ended up with the same name.
    #[error("Duplicate feature name '{name}' after encoding")]
    DuplicateFeatureName { name: String },

    /// Test fraction outside `[0, 1)`.
    #[error("Test fraction must be in [0, 1), got {fraction}")]
    InvalidTestFraction { fraction: f64 },

    /// A hyperparameter option has no candidate values.
    #[error("Hyperparameter grid option '{option}' has no candidate values")]
    EmptyGrid { option: &'static str },

    /// The grid's cartesian product does not fit in memory addressing.
    #[error("Hyperparameter grid has too many combinations to enumerate")]
    GridTooLarge,

    /// The search was asked to sample no configurations.
    #[error("Number of sampled configurations must be at least 1")]
    InvalidIterationCount,

    /// A sampled hyperparameter configuration cannot be fitted.
    #[error("Invalid hyperparameter configuration #{candidate} ({params}): {reason}")]
    InvalidConfiguration {
        candidate: usize,
        params: String,
        reason: String,
    },

    /// Cross-validation needs at least two folds.
    #[error("Number of cross-validation folds must be at least 2, got {folds}")]
    InvalidFoldCount { folds: usize },

    /// Fewer training rows than folds.
    #[error("Cannot split {samples} training rows into {folds} folds")]
    TooFewSamplesForFolds { samples: usize, folds: usize },

    /// Worker count of zero.
    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,

    /// The dedicated search thread pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Relative error is undefined when an actual value is zero.
    #[error("Accuracy is undefined: actual value at row {row} is zero")]
    DivisionByZero { row: usize },

    /// Nothing to evaluate.
    #[error("Cannot evaluate on an empty set")]
    EmptyEvaluationSet,

    /// Prediction and target vectors differ in length.
    #[error("Got {predictions} predictions for {actual} actual values")]
    LengthMismatch { predictions: usize, actual: usize },

    /// Feature labels supplied by the caller differ from the fitted columns.
    #[error("Feature labels do not match the fitted model: expected {expected:?}, got {got:?}")]
    FeatureLabelMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    /// The regression forest rejected its input.
    #[error(transparent)]
    Forest(#[from] ForestError),

    /// Any other dataframe failure.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Convenience alias used across the pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_display() {
        let err = PipelineError::MissingColumn {
            column: "oil_180".to_string(),
            available: vec!["depth".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Target column 'oil_180' not found in dataset. Available columns: [\"depth\"]"
        );
    }

    #[test]
    fn test_division_by_zero_display() {
        let err = PipelineError::DivisionByZero { row: 4 };
        assert_eq!(
            err.to_string(),
            "Accuracy is undefined: actual value at row 4 is zero"
        );
    }

    #[test]
    fn test_forest_error_is_transparent() {
        let err: PipelineError = ForestError::EmptyDataset.into();
        assert_eq!(err.to_string(), "training dataset has zero samples");
    }
}
