//! Arena node types for regression trees.

use std::fmt;

/// Index into a tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena position.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in a regression tree arena.
///
/// Children are referenced by [`NodeIndex`]; the root is always index 0.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An interior split node. Samples with `value <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: NodeIndex,
        right: NodeIndex,
        /// Mean squared error of the targets reaching this node.
        mse: f64,
        n_samples: usize,
        /// Weighted decrease in squared error produced by this split.
        impurity_decrease: f64,
    },
    /// A terminal leaf predicting the mean of its training targets.
    Leaf {
        value: f64,
        mse: f64,
        n_samples: usize,
    },
}

impl Node {
    #[must_use]
    pub fn mse(&self) -> f64 {
        match self {
            Node::Split { mse, .. } | Node::Leaf { mse, .. } => *mse,
        }
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        match self {
            Node::Split { n_samples, .. } | Node::Leaf { n_samples, .. } => *n_samples,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}
