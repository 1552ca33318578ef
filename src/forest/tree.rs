//! CART regression tree grown on column-major data.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::forest::error::ForestError;
use crate::forest::node::{Node, NodeIndex};
use crate::forest::split::{find_best_split, sum_squared_error};

/// Stopping rules shared by every tree of a forest.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    /// Already resolved against the feature count.
    pub(crate) max_features: usize,
}

/// A fitted regression tree stored as a node arena.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) n_features: usize,
}

impl RegressionTree {
    /// Grow a tree over `sample_indices` (duplicates allowed).
    pub(crate) fn grow(
        col_features: &[Vec<f64>],
        targets: &[f64],
        sample_indices: &[usize],
        params: &TreeParams,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut arena = Vec::new();
        build_node(
            col_features,
            targets,
            sample_indices,
            params,
            0,
            &mut rng,
            &mut arena,
        );
        Self {
            nodes: arena,
            n_features: col_features.len(),
        }
    }

    /// Predict the response for one sample.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] when the sample width
    /// differs from the training width.
    pub fn predict(&self, sample: &[f64]) -> Result<f64, ForestError> {
        if sample.len() != self.n_features {
            return Err(ForestError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        Ok(self.predict_unchecked(sample))
    }

    pub(crate) fn predict_unchecked(&self, sample: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value, .. } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if sample[*feature] <= *threshold {
                        left.index()
                    } else {
                        right.index()
                    };
                }
            }
        }
    }

    /// Mean decrease in impurity per feature, normalised to sum to 1.0.
    ///
    /// All zeros when the tree is a single leaf.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.n_features];
        for node in &self.nodes {
            if let Node::Split {
                feature,
                impurity_decrease,
                ..
            } = node
            {
                totals[*feature] += impurity_decrease;
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|v| *v /= sum);
        }
        totals
    }

    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Depth of the deepest leaf; a lone root leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0usize;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            match &self.nodes[idx] {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((left.index(), depth + 1));
                    stack.push((right.index(), depth + 1));
                }
            }
        }
        max_depth
    }
}

/// Recursively build the arena; returns the index of the node just created.
fn build_node(
    col_features: &[Vec<f64>],
    targets: &[f64],
    sample_indices: &[usize],
    params: &TreeParams,
    depth: usize,
    rng: &mut ChaCha8Rng,
    arena: &mut Vec<Node>,
) -> NodeIndex {
    let n_samples = sample_indices.len();
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &si in sample_indices {
        let y = targets[si];
        sum += y;
        sum_sq += y * y;
        min = min.min(y);
        max = max.max(y);
    }
    let mse = sum_squared_error(sum, sum_sq, n_samples) / n_samples.max(1) as f64;
    let mean = if n_samples > 0 { sum / n_samples as f64 } else { 0.0 };

    let make_leaf = |arena: &mut Vec<Node>| -> NodeIndex {
        arena.push(Node::Leaf {
            value: mean,
            mse,
            n_samples,
        });
        NodeIndex::new(arena.len() - 1)
    };

    let depth_exceeded = params.max_depth.is_some_and(|d| depth >= d);
    let too_few = n_samples < params.min_samples_split
        || n_samples < 2 * params.min_samples_leaf;
    let pure = min == max;
    if depth_exceeded || too_few || pure {
        return make_leaf(arena);
    }

    let split = match find_best_split(
        col_features,
        targets,
        sample_indices,
        params.max_features,
        params.min_samples_leaf,
        rng,
    ) {
        Some(s) => s,
        None => return make_leaf(arena),
    };
    if split.left_indices.is_empty() || split.right_indices.is_empty() {
        return make_leaf(arena);
    }

    // Reserve the slot so children get larger indices, then overwrite.
    let node_idx = arena.len();
    arena.push(Node::Leaf {
        value: mean,
        mse,
        n_samples,
    });

    let left = build_node(
        col_features,
        targets,
        &split.left_indices,
        params,
        depth + 1,
        rng,
        arena,
    );
    let right = build_node(
        col_features,
        targets,
        &split.right_indices,
        params,
        depth + 1,
        rng,
        arena,
    );

    arena[node_idx] = Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left,
        right,
        mse,
        n_samples,
        impurity_decrease: split.impurity_decrease,
    };
    NodeIndex::new(node_idx)
}
