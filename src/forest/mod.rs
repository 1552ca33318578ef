//! Random-forest regression: CART trees with variance-reduction splits,
//! bootstrap aggregation, parallel training via rayon and impurity-based
//! feature importances.

mod config;
mod error;
#[allow(clippy::module_inception)]
mod forest;
mod node;
mod split;
mod tree;

pub use config::{MaxFeatures, RandomForestConfig};
pub use error::ForestError;
pub use forest::RandomForest;
pub use node::{Node, NodeIndex};
pub use tree::RegressionTree;
