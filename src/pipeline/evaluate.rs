//! Prediction error, accuracy percentage and cross-validation scoring.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::forest::RandomForest;
use crate::pipeline::error::{PipelineError, Result};
use crate::pipeline::features::FeatureMatrix;

/// Error and accuracy of a model on one evaluation set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    /// Mean of `|prediction - actual|`.
    pub mean_absolute_error: f64,
    /// Mean of `100 * |prediction - actual| / actual`.
    pub mean_absolute_percentage_error: f64,
    /// `100 - mean_absolute_percentage_error`.
    pub accuracy: f64,
    pub n_samples: usize,
}

fn check_lengths(predictions: &[f64], actual: &[f64]) -> Result<()> {
    if predictions.len() != actual.len() {
        return Err(PipelineError::LengthMismatch {
            predictions: predictions.len(),
            actual: actual.len(),
        });
    }
    if actual.is_empty() {
        return Err(PipelineError::EmptyEvaluationSet);
    }
    Ok(())
}

/// Compute error and accuracy from predictions.
///
/// # Errors
///
/// [`PipelineError::DivisionByZero`] if any actual value is zero, since the
/// relative error is undefined there.
pub fn accuracy_metrics(predictions: &[f64], actual: &[f64]) -> Result<Evaluation> {
    check_lengths(predictions, actual)?;

    if let Some(row) = actual.iter().position(|&a| a == 0.0) {
        return Err(PipelineError::DivisionByZero { row });
    }

    let n = actual.len() as f64;
    let (abs_total, rel_total) = predictions
        .iter()
        .zip(actual)
        .fold((0.0, 0.0), |(abs_acc, rel_acc), (&p, &a)| {
            let err = (p - a).abs();
            (abs_acc + err, rel_acc + err / a)
        });

    let mape = 100.0 * rel_total / n;
    Ok(Evaluation {
        mean_absolute_error: abs_total / n,
        mean_absolute_percentage_error: mape,
        accuracy: 100.0 - mape,
        n_samples: actual.len(),
    })
}

/// Predict `features` with `forest` and compute [`accuracy_metrics`].
///
/// The matrix must carry the labels the forest was fitted with.
pub fn evaluate(
    forest: &RandomForest,
    features: &FeatureMatrix,
    actual: &[f64],
) -> Result<Evaluation> {
    if forest.feature_names() != features.names() {
        return Err(PipelineError::FeatureLabelMismatch {
            expected: forest.feature_names().to_vec(),
            got: features.names().to_vec(),
        });
    }
    let predictions = forest.predict_batch(features.rows())?;
    accuracy_metrics(&predictions, actual)
}

/// Relative accuracy gain of `tuned` over `baseline`, in percent.
///
/// `None` when the baseline accuracy is zero or the ratio is not finite.
pub fn improvement_pct(baseline: &Evaluation, tuned: &Evaluation) -> Option<f64> {
    if baseline.accuracy == 0.0 {
        return None;
    }
    let pct = 100.0 * (tuned.accuracy - baseline.accuracy) / baseline.accuracy;
    pct.is_finite().then_some(pct)
}

/// Coefficient of determination. A constant target scores 1.0 when predicted
/// exactly and 0.0 otherwise.
pub fn r2_score(predictions: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predictions, actual)?;
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_res: f64 = predictions
        .iter()
        .zip(actual)
        .map(|(p, a)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

pub fn mean_absolute_error(predictions: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predictions, actual)?;
    let total: f64 = predictions.iter().zip(actual).map(|(p, a)| (p - a).abs()).sum();
    Ok(total / actual.len() as f64)
}

/// Validation score maximised by the hyperparameter search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scoring {
    /// Coefficient of determination.
    #[default]
    R2,
    /// Negated mean absolute error, so that larger is better.
    NegMae,
}

impl Scoring {
    pub fn score(self, predictions: &[f64], actual: &[f64]) -> Result<f64> {
        match self {
            Scoring::R2 => r2_score(predictions, actual),
            Scoring::NegMae => mean_absolute_error(predictions, actual).map(|mae| -mae),
        }
    }
}

impl fmt::Display for Scoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scoring::R2 => write!(f, "r2"),
            Scoring::NegMae => write!(f, "neg-mae"),
        }
    }
}

impl FromStr for Scoring {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "r2" => Ok(Scoring::R2),
            "neg-mae" | "neg_mae" => Ok(Scoring::NegMae),
            other => Err(format!(
                "Unknown scoring '{}'. Options: r2, neg-mae",
                other
            )),
        }
    }
}
