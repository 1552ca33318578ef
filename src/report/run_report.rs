//! JSON export of a complete forecast run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CandidateScore, Evaluation, HyperparameterSet, RankedFeature, Scoring};

/// Metadata about the run
#[derive(Debug, Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub wellcast_version: String,
    pub input_file: String,
    pub target_column: String,
    pub seed: u64,
    pub test_fraction: f64,
    pub n_iter: usize,
    pub cv_folds: usize,
    pub workers: usize,
    pub scoring: String,
    pub baseline_trees: usize,
}

/// Shape of the data each stage saw
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub features: usize,
    pub numeric_columns: usize,
    pub categorical_columns: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchSummary {
    pub grid_combinations: usize,
    pub fits: usize,
    pub best_candidate: usize,
    pub best_score: f64,
    pub best_params: HyperparameterSet,
    pub candidates: Vec<CandidateScore>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationSummary {
    pub baseline_train: Evaluation,
    pub tuned_train: Evaluation,
    /// `null` when the baseline accuracy is zero.
    pub improvement_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuned_test: Option<Evaluation>,
}

/// Complete run export
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub dataset: DatasetSummary,
    pub search: SearchSummary,
    pub evaluation: EvaluationSummary,
    pub feature_importances: Vec<RankedFeature>,
}

/// Run parameters recorded in the report metadata
#[derive(Debug, Clone, Copy)]
pub struct ReportParams<'a> {
    pub input_file: &'a str,
    pub target_column: &'a str,
    pub seed: u64,
    pub test_fraction: f64,
    pub n_iter: usize,
    pub cv_folds: usize,
    pub workers: usize,
    pub scoring: Scoring,
    pub baseline_trees: usize,
}

impl RunMetadata {
    /// Stamp the parameters with the current UTC time and crate version.
    pub fn now(params: &ReportParams<'_>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            wellcast_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            target_column: params.target_column.to_string(),
            seed: params.seed,
            test_fraction: params.test_fraction,
            n_iter: params.n_iter,
            cv_folds: params.cv_folds,
            workers: params.workers,
            scoring: params.scoring.to_string(),
            baseline_trees: params.baseline_trees,
        }
    }
}

/// Write the run report as pretty-printed JSON.
pub fn export_run_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize run report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write run report to {}", output_path.display()))?;

    Ok(())
}
