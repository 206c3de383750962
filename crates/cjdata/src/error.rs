//! Error types for local data access.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for local data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while reading the local store.
///
/// Absent data (unknown code, empty range, missing sector) is never reported
/// through this type; those cases produce empty results instead.
#[derive(Debug, Error)]
pub enum DataError {
    /// The store could not be opened
    #[error("Cannot open store at {}: {reason}", .path.display())]
    Connection {
        /// Path that was opened
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed date string
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Malformed stock code
    #[error("Invalid stock code: {0}")]
    InvalidCode(String),

    /// Unrecognized adjustment mode
    #[error("Invalid adjustment mode: {0:?} (expected \"\", \"none\", \"hfq\" or \"qfq\")")]
    InvalidAdjustMode(String),

    /// Unrecognized code format
    #[error("Invalid code format: {0:?}")]
    InvalidCodeFormat(String),

    /// Unrecognized exchange
    #[error("Invalid exchange: {0:?} (expected SH, SZ or BJ)")]
    InvalidExchange(String),

    /// The handle was used after `close()`
    #[error("Store connection is closed")]
    Closed,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
