//! Error types for mtd-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mtd-core
///
/// Every variant is fatal for the run that produced it. Missing lookup
/// entries and missing lookup files are not errors; they are reported
/// through a [`crate::warnings::WarningSink`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required input file does not exist
    #[error("{kind} file not found: {}", path.display())]
    MissingInput { kind: &'static str, path: PathBuf },

    /// An input file exists but has no usable entries
    #[error("no series codes found in file: {}", path.display())]
    EmptyInput { path: PathBuf },

    /// Required header columns are absent
    #[error("required columns ({}) not found in '{}'", columns.join(", "), path.display())]
    Schema { path: PathBuf, columns: Vec<String> },

    /// TSV decoding error from the csv crate
    #[error("TSV error in '{path}': {source}")]
    Tsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// task_detail_id numbering ran past u64::MAX
    #[error("task_detail_id overflow: {rows} rows do not fit after {start_id}")]
    TaskIdOverflow { start_id: u64, rows: usize },

    /// A series code that cannot be used as part of a file name
    #[error("series code '{code}' cannot be used in an output file name")]
    InvalidSeriesCode { code: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
