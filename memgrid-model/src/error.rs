//! Error types for the record model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while projecting or assembling records.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A record did not serialize to a JSON object. Programmer error in the
    /// schema pairing, not retried.
    #[error("projection error: {0}")]
    Projection(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
