//! Error types for the indexed store.

use thiserror::Error;

/// Result type for indexed store operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur in indexed store operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Backend failure outside SQL itself (poisoned lock, unreachable file).
    #[error("storage error: {0}")]
    Storage(String),

    /// A stored row could not be decoded (corrupt fields JSON, bad identity).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The caller built an unsupported query (non-scalar filter value,
    /// malformed sort field).
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
