//! Report module - console summary and JSON run export

pub mod run_report;
pub mod summary;

pub use run_report::*;
pub use summary::*;
