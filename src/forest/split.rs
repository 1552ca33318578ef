//! Variance-reduction split search for regression trees.

use rand::Rng;

/// Sum of squared deviations from the mean, from running sums.
#[inline]
pub(crate) fn sum_squared_error(sum: f64, sum_sq: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    (sum_sq - sum * sum / n as f64).max(0.0)
}

/// The outcome of a successful split search.
#[derive(Debug)]
pub(crate) struct SplitResult {
    pub(crate) feature: usize,
    /// Samples with `value <= threshold` go left.
    pub(crate) threshold: f64,
    /// Parent squared error minus the children's squared error.
    pub(crate) impurity_decrease: f64,
    pub(crate) left_indices: Vec<usize>,
    pub(crate) right_indices: Vec<usize>,
}

/// Threshold between two distinct sorted values. Falls back to `value` when
/// the midpoint rounds up to `next_value`, so `next_value` always goes right.
fn midpoint(value: f64, next_value: f64) -> f64 {
    let mid = value + (next_value - value) / 2.0;
    if mid < next_value {
        mid
    } else {
        value
    }
}

/// Find the best split among a random subset of `max_features` features.
///
/// `features` is column-major: `features[feature_idx][sample_idx]`, and
/// `sample_indices` may repeat a sample (bootstrap draws). Returns `None`
/// when no boundary satisfies `min_samples_leaf` on both sides.
pub(crate) fn find_best_split(
    features: &[Vec<f64>],
    targets: &[f64],
    sample_indices: &[usize],
    max_features: usize,
    min_samples_leaf: usize,
    rng: &mut impl Rng,
) -> Option<SplitResult> {
    let n_features = features.len();
    let n_samples = sample_indices.len();
    if n_samples < 2 || n_features == 0 {
        return None;
    }

    let (total_sum, total_sq) = sample_indices.iter().fold((0.0, 0.0), |(s, q), &si| {
        let y = targets[si];
        (s + y, q + y * y)
    });
    let parent_sse = sum_squared_error(total_sum, total_sq, n_samples);

    // Partial Fisher-Yates over the feature order.
    let mut feature_order: Vec<usize> = (0..n_features).collect();
    let take = max_features.min(n_features);
    for i in 0..take {
        let j = rng.gen_range(i..n_features);
        feature_order.swap(i, j);
    }

    let mut best_decrease = f64::NEG_INFINITY;
    let mut best: Option<(usize, f64)> = None;
    let mut sorted: Vec<(f64, f64)> = Vec::with_capacity(n_samples);

    for &feat_idx in &feature_order[..take] {
        let column = &features[feat_idx];
        sorted.clear();
        sorted.extend(sample_indices.iter().map(|&si| (column[si], targets[si])));
        sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for i in 0..(n_samples - 1) {
            let (value, y) = sorted[i];
            left_sum += y;
            left_sq += y * y;

            let next_value = sorted[i + 1].0;
            if value == next_value {
                continue;
            }

            let n_left = i + 1;
            let n_right = n_samples - n_left;
            if n_left < min_samples_leaf || n_right < min_samples_leaf {
                continue;
            }

            let left_sse = sum_squared_error(left_sum, left_sq, n_left);
            let right_sse =
                sum_squared_error(total_sum - left_sum, total_sq - left_sq, n_right);
            let decrease = parent_sse - left_sse - right_sse;

            if decrease > best_decrease {
                best_decrease = decrease;
                best = Some((feat_idx, midpoint(value, next_value)));
            }
        }
    }

    let (feature, threshold) = best?;
    let column = &features[feature];
    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = sample_indices
        .iter()
        .partition(|&&si| column[si] <= threshold);

    Some(SplitResult {
        feature,
        threshold,
        impurity_decrease: best_decrease.max(0.0),
        left_indices,
        right_indices,
    })
}
