//! Error types for the value store adapter.

use thiserror::Error;

/// Result type for value store operations.
pub type KvResult<T> = Result<T, KvError>;

/// Errors that can occur in value store operations.
#[derive(Debug, Error)]
pub enum KvError {
    /// Backend storage error (SQL failure, poisoned lock, corrupt row).
    #[error("storage error: {0}")]
    Storage(String),

    /// The backend could not be reached at all.
    #[error("value store unavailable: {0}")]
    Unavailable(String),
}
