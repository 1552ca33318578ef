//! Wellcast: early-production forecasting library
//!
//! Loads a cleaned table of oil-well attributes, fits a random-forest
//! regressor tuned by randomized cross-validated search, and reports
//! accuracy and ranked feature importances.

pub mod cli;
pub mod forest;
pub mod pipeline;
pub mod report;
pub mod utils;
