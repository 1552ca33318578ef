//! Modelling pipeline stages: load, encode, partition, search, evaluate, rank.

pub mod cv;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod importance;
pub mod loader;
pub mod partition;
pub mod search;

pub use cv::{k_fold, FoldSplit};
pub use error::{PipelineError, Result};
pub use evaluate::{
    accuracy_metrics, evaluate, improvement_pct, mean_absolute_error, r2_score, Evaluation,
    Scoring,
};
pub use features::{split_features_target, ColumnEncoding, FeatureMatrix, FeatureSet};
pub use importance::{rank_feature_importances, RankedFeature};
pub use loader::{get_column_names, load_dataset, load_dataset_with_progress};
pub use partition::{test_size, train_test_split, TrainTestSplit};
pub use search::{
    randomized_search, sample_candidates, CandidateScore, HyperparameterGrid,
    HyperparameterSet, SearchConfig, SearchResult,
};
