//! Randomized cross-validated hyperparameter search over a regression forest.
//!
//! Candidates are drawn without replacement from the grid's cartesian
//! product, every (candidate, fold) fit runs on a dedicated rayon pool of an
//! explicit size, and the candidate with the best mean validation score is
//! refit on the full training set.

use std::fmt;

use rand::seq::index;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::forest::{ForestError, MaxFeatures, RandomForest, RandomForestConfig};
use crate::pipeline::cv::k_fold;
use crate::pipeline::error::{PipelineError, Result};
use crate::pipeline::evaluate::Scoring;
use crate::pipeline::features::FeatureMatrix;
use crate::utils::{create_progress_bar, finish_with_success};

/// Candidate values for every tunable forest option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperparameterGrid {
    pub n_estimators: Vec<usize>,
    pub max_features: Vec<MaxFeatures>,
    pub max_depth: Vec<Option<usize>>,
    pub min_samples_split: Vec<usize>,
    pub min_samples_leaf: Vec<usize>,
    pub bootstrap: Vec<bool>,
}

impl Default for HyperparameterGrid {
    /// 200..=2000 trees in steps of 200, depth 10..=110 in steps of 10 or
    /// unlimited, and the usual split/leaf minimums: 4320 combinations.
    fn default() -> Self {
        let mut max_depth: Vec<Option<usize>> = (1..=11).map(|i| Some(i * 10)).collect();
        max_depth.push(None);
        Self {
            n_estimators: (1..=10).map(|i| i * 200).collect(),
            max_features: vec![MaxFeatures::Auto, MaxFeatures::Sqrt],
            max_depth,
            min_samples_split: vec![2, 5, 10],
            min_samples_leaf: vec![1, 2, 4],
            bootstrap: vec![true, false],
        }
    }
}

impl HyperparameterGrid {
    fn option_sizes(&self) -> [(&'static str, usize); 6] {
        [
            ("n_estimators", self.n_estimators.len()),
            ("max_features", self.max_features.len()),
            ("max_depth", self.max_depth.len()),
            ("min_samples_split", self.min_samples_split.len()),
            ("min_samples_leaf", self.min_samples_leaf.len()),
            ("bootstrap", self.bootstrap.len()),
        ]
    }

    /// Size of the cartesian product of all options.
    ///
    /// # Errors
    ///
    /// [`PipelineError::EmptyGrid`] if an option has no values,
    /// [`PipelineError::GridTooLarge`] if the product overflows.
    pub fn n_combinations(&self) -> Result<usize> {
        let mut total: usize = 1;
        for (option, size) in self.option_sizes() {
            if size == 0 {
                return Err(PipelineError::EmptyGrid { option });
            }
            total = total.checked_mul(size).ok_or(PipelineError::GridTooLarge)?;
        }
        Ok(total)
    }

    /// Decode a position of the cartesian product, the last option varying
    /// fastest. Returns `None` past the end of the product.
    pub fn combination(&self, position: usize) -> Option<HyperparameterSet> {
        if position >= self.n_combinations().ok()? {
            return None;
        }
        let sizes = self.option_sizes();
        let mut digits = [0usize; 6];
        let mut rest = position;
        for (digit, (_, size)) in digits.iter_mut().zip(sizes.iter()).rev() {
            *digit = rest % size;
            rest /= size;
        }
        Some(HyperparameterSet {
            n_estimators: self.n_estimators[digits[0]],
            max_features: self.max_features[digits[1]],
            max_depth: self.max_depth[digits[2]],
            min_samples_split: self.min_samples_split[digits[3]],
            min_samples_leaf: self.min_samples_leaf[digits[4]],
            bootstrap: self.bootstrap[digits[5]],
        })
    }
}

/// One point of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HyperparameterSet {
    pub n_estimators: usize,
    pub max_features: MaxFeatures,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub bootstrap: bool,
}

impl HyperparameterSet {
    /// Forest configuration for these values with the given seed.
    pub fn forest_config(&self, seed: u64) -> std::result::Result<RandomForestConfig, ForestError> {
        Ok(RandomForestConfig::new(self.n_estimators)?
            .with_max_features(self.max_features)
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf)
            .with_bootstrap(self.bootstrap)
            .with_seed(seed))
    }

    /// `(option, value)` pairs in grid order, for display.
    pub fn as_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("n_estimators", self.n_estimators.to_string()),
            ("max_features", self.max_features.to_string()),
            (
                "max_depth",
                self.max_depth
                    .map_or_else(|| "None".to_string(), |d| d.to_string()),
            ),
            ("min_samples_split", self.min_samples_split.to_string()),
            ("min_samples_leaf", self.min_samples_leaf.to_string()),
            ("bootstrap", self.bootstrap.to_string()),
        ]
    }
}

impl fmt::Display for HyperparameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .as_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", text)
    }
}

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Maximum number of distinct configurations to sample.
    pub n_iter: usize,
    /// Number of cross-validation folds.
    pub cv: usize,
    pub scoring: Scoring,
    /// Size of the worker pool running fold fits.
    pub workers: usize,
    /// Shuffle rows before cutting folds.
    pub shuffle_folds: bool,
}

/// Cross-validation outcome of one sampled configuration.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    /// Draw order, starting at 0.
    pub candidate: usize,
    pub params: HyperparameterSet,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
    pub std_score: f64,
}

/// Best configuration plus the forest refit on all training rows.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_params: HyperparameterSet,
    pub best_score: f64,
    pub best_candidate: usize,
    pub candidates: Vec<CandidateScore>,
    pub best_forest: RandomForest,
    /// Fold fits plus the final refit.
    pub n_fits: usize,
}

/// Rows and targets of one fold, materialized once and shared by all tasks.
struct FoldData {
    train_rows: Vec<Vec<f64>>,
    train_targets: Vec<f64>,
    validation_rows: Vec<Vec<f64>>,
    validation_targets: Vec<f64>,
}

/// Draw up to `n_iter` distinct grid positions and decode them.
pub fn sample_candidates<R: Rng + ?Sized>(
    grid: &HyperparameterGrid,
    n_iter: usize,
    rng: &mut R,
) -> Result<Vec<HyperparameterSet>> {
    if n_iter == 0 {
        return Err(PipelineError::InvalidIterationCount);
    }
    let total = grid.n_combinations()?;
    let amount = n_iter.min(total);
    Ok(index::sample(rng, total, amount)
        .into_iter()
        .filter_map(|position| grid.combination(position))
        .collect())
}

/// Run the randomized search on the training data.
///
/// Every sampled configuration is validated before any fitting starts; the
/// first invalid one aborts the search with
/// [`PipelineError::InvalidConfiguration`]. Per-task seeds are drawn from
/// `rng` up front so the outcome does not depend on `workers`.
#[instrument(skip_all, fields(n_iter = config.n_iter, cv = config.cv, workers = config.workers))]
pub fn randomized_search<R: Rng + ?Sized>(
    grid: &HyperparameterGrid,
    config: &SearchConfig,
    features: &FeatureMatrix,
    targets: &[f64],
    rng: &mut R,
) -> Result<SearchResult> {
    if config.workers == 0 {
        return Err(PipelineError::InvalidWorkerCount);
    }
    if features.n_rows() != targets.len() {
        return Err(PipelineError::LengthMismatch {
            predictions: features.n_rows(),
            actual: targets.len(),
        });
    }

    let candidates = sample_candidates(grid, config.n_iter, rng)?;
    for (candidate, params) in candidates.iter().enumerate() {
        params
            .forest_config(0)
            .and_then(|c| c.validate(features.n_features()))
            .map_err(|e| PipelineError::InvalidConfiguration {
                candidate,
                params: params.to_string(),
                reason: e.to_string(),
            })?;
    }

    let folds = if config.shuffle_folds {
        k_fold(features.n_rows(), config.cv, Some(&mut *rng))?
    } else {
        k_fold::<R>(features.n_rows(), config.cv, None)?
    };
    let fold_data: Vec<FoldData> = folds
        .iter()
        .map(|split| FoldData {
            train_rows: split
                .train_indices
                .iter()
                .map(|&i| features.rows()[i].clone())
                .collect(),
            train_targets: split.train_indices.iter().map(|&i| targets[i]).collect(),
            validation_rows: split
                .validation_indices
                .iter()
                .map(|&i| features.rows()[i].clone())
                .collect(),
            validation_targets: split
                .validation_indices
                .iter()
                .map(|&i| targets[i])
                .collect(),
        })
        .collect();

    let tasks: Vec<(usize, usize, u64)> = (0..candidates.len())
        .flat_map(|c| (0..fold_data.len()).map(move |f| (c, f)))
        .map(|(c, f)| (c, f, rng.gen()))
        .collect();
    let refit_seed: u64 = rng.gen();

    info!(
        n_candidates = candidates.len(),
        n_folds = fold_data.len(),
        n_tasks = tasks.len(),
        "starting randomized search"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;

    let pb = create_progress_bar(
        tasks.len() as u64,
        &format!(
            "   Fitting {} folds for each of {} candidates",
            fold_data.len(),
            candidates.len()
        ),
    );

    let names = features.names();
    let scored: Vec<(usize, usize, f64)> = pool.install(|| {
        tasks
            .par_iter()
            .map(|&(c, f, seed)| -> Result<(usize, usize, f64)> {
                let fold = &fold_data[f];
                let forest = candidates[c]
                    .forest_config(seed)?
                    .fit(&fold.train_rows, &fold.train_targets, names)?;
                let predictions = forest.predict_batch(&fold.validation_rows)?;
                let score = config.scoring.score(&predictions, &fold.validation_targets)?;
                pb.inc(1);
                Ok((c, f, score))
            })
            .collect::<Result<Vec<_>>>()
    })?;
    finish_with_success(&pb, &format!("Completed {} fold fits", tasks.len()));

    let mut fold_scores = vec![vec![0.0f64; fold_data.len()]; candidates.len()];
    for (c, f, score) in scored {
        fold_scores[c][f] = score;
    }

    let scores: Vec<CandidateScore> = candidates
        .iter()
        .zip(fold_scores)
        .enumerate()
        .map(|(candidate, (params, fold_scores))| {
            let n = fold_scores.len() as f64;
            let mean_score = fold_scores.iter().sum::<f64>() / n;
            let variance = fold_scores
                .iter()
                .map(|s| (s - mean_score).powi(2))
                .sum::<f64>()
                / n;
            debug!(candidate, mean_score, params = %params, "candidate scored");
            CandidateScore {
                candidate,
                params: *params,
                fold_scores,
                mean_score,
                std_score: variance.sqrt(),
            }
        })
        .collect();

    let mut best_candidate = 0;
    for entry in &scores[1..] {
        if entry.mean_score > scores[best_candidate].mean_score {
            best_candidate = entry.candidate;
        }
    }
    let best_params = scores[best_candidate].params;
    let best_score = scores[best_candidate].mean_score;

    info!(best_candidate, best_score, params = %best_params, "refitting best configuration");

    let best_forest = pool.install(|| {
        best_params
            .forest_config(refit_seed)?
            .fit(features.rows(), targets, names)
    })?;

    Ok(SearchResult {
        best_params,
        best_score,
        best_candidate,
        n_fits: tasks.len() + 1,
        candidates: scores,
        best_forest,
    })
}
