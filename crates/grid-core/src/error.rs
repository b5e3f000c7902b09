//! Error types for grid-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in grid-core
#[derive(Debug, Error)]
pub enum Error {
    /// Adding a column whose field already exists
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    /// Adding a column with a blank or reserved name
    #[error("column name must not be empty")]
    EmptyColumnName,

    /// A staged draft value failed type validation at Save All
    #[error("invalid value for '{column}', correct it before saving")]
    ValidationFailure { column: String },

    /// Imported payload contained no rows
    #[error("import has no rows")]
    EmptyImport,

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV input
    #[error("failed to parse CSV: {0}")]
    CsvParse(String),

    /// CSV error from the csv crate
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
