//! Ranked impurity-based feature importances.

use serde::Serialize;

use crate::forest::RandomForest;
use crate::pipeline::error::{PipelineError, Result};
use crate::pipeline::features::FeatureMatrix;

/// One row of the importance table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFeature {
    pub name: String,
    pub importance: f64,
    /// 1-based position after sorting by descending importance.
    pub rank: usize,
}

/// Pair the forest's importances with the labels of `features` and sort them
/// by descending importance. Equal importances keep column order.
///
/// # Errors
///
/// [`PipelineError::FeatureLabelMismatch`] when the labels differ in content
/// or order from the columns the forest was fitted on.
pub fn rank_feature_importances(
    forest: &RandomForest,
    features: &FeatureMatrix,
) -> Result<Vec<RankedFeature>> {
    if forest.feature_names() != features.names() {
        return Err(PipelineError::FeatureLabelMismatch {
            expected: forest.feature_names().to_vec(),
            got: features.names().to_vec(),
        });
    }

    let mut pairs: Vec<(String, f64)> = features
        .names()
        .iter()
        .cloned()
        .zip(forest.feature_importances())
        .collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(pairs
        .into_iter()
        .enumerate()
        .map(|(i, (name, importance))| RankedFeature {
            name,
            importance,
            rank: i + 1,
        })
        .collect())
}
