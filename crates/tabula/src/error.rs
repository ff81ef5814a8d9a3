//! Error types for the Tabula library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Tabula operations.
#[derive(Debug, Error)]
pub enum TabulaError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing CSV/TSV data.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no columns to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Error from the embedded SQLite store.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No table with the given name has been loaded.
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// Query refused before execution (only SELECT is allowed).
    #[error("only SELECT queries are allowed: {0}")]
    QueryRejected(String),

    /// Query failed while executing against the store.
    #[error("query failed: {0}")]
    Query(String),
}

impl TabulaError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TabulaError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors caused by the caller's query text.
    pub fn is_query_error(&self) -> bool {
        matches!(self, TabulaError::QueryRejected(_) | TabulaError::Query(_))
    }
}

/// Result type alias for Tabula operations.
pub type Result<T> = std::result::Result<T, TabulaError>;
