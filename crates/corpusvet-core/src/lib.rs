//! Core engine for Corpusvet: task-tree classification and the CSV-backed
//! review-progress ledger.

pub mod classify;
pub mod config;
pub mod ledger;
pub mod mutate;
pub mod records;

/// Name of the diff file a classification pipeline writes into a task
/// directory (or its `output` subdirectory).
pub const DIFF_FILENAME: &str = "frontend_diff.json";

/// Name of the CSV progress ledger kept next to the diff file.
pub const LEDGER_FILENAME: &str = "progress_log.csv";

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
