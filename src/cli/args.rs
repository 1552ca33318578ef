//! Command-line argument definitions using clap

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::Scoring;

/// Wellcast - Forecast early-life oil production with a tuned random forest
#[derive(Parser, Debug)]
#[command(name = "wellcast")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Target column name (production volume).
    /// If not provided, will be selected interactively from available columns.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Fraction of rows held out as the test set, in [0, 1)
    #[arg(long, default_value = "0.01", value_parser = validate_test_fraction)]
    pub test_fraction: f64,

    /// Seed for the train/test split, the search draws and every forest
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of hyperparameter configurations sampled from the grid
    #[arg(long, default_value = "100", value_parser = validate_at_least_one)]
    pub n_iter: usize,

    /// Number of cross-validation folds
    #[arg(long, default_value = "3", value_parser = validate_folds)]
    pub cv: usize,

    /// Worker threads used for fitting. Defaults to the available parallelism.
    #[arg(long, default_value_t = default_workers(), value_parser = validate_at_least_one)]
    pub workers: usize,

    /// Number of trees in the untuned baseline forest
    #[arg(long, default_value = "10", value_parser = validate_at_least_one)]
    pub baseline_trees: usize,

    /// Validation score maximised by the search.
    /// Options: "r2" (default) or "neg-mae"
    #[arg(long, default_value = "r2")]
    pub scoring: Scoring,

    /// Shuffle training rows before cutting cross-validation folds
    #[arg(long, default_value = "false")]
    pub shuffle_folds: bool,

    /// Columns to drop before building features (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Skip interactive prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Emit debug logs to stderr
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Validator for test_fraction parameter
fn validate_test_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..1.0).contains(&value) {
        Err(format!(
            "test_fraction must be at least 0.0 and below 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

fn validate_at_least_one(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;
    if value == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for cv parameter
fn validate_folds(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;
    if value < 2 {
        Err(format!("cv must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}
