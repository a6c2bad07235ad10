//! Error types for the repository layer.

use memgrid_index::IndexError;
use memgrid_kv::KvError;
use memgrid_model::ModelError;
use memgrid_types::RecordId;
use thiserror::Error;

/// Result type for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The identity is absent from the store that was required to hold it.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The indexed-store insert succeeded but the value-store write failed.
    /// The accepted inconsistency window: the index now holds a row with no
    /// value payload. Carries the assigned identity so the caller can retry
    /// the value write without re-inserting the index row.
    #[error("index row {id} written but value store write failed: {source}")]
    PartialWrite {
        id: RecordId,
        #[source]
        source: KvError,
    },

    /// Schema field extraction failed. Programmer error, not retried.
    #[error("projection error: {0}")]
    Projection(String),

    /// Value store failure, propagated.
    #[error("value store error: {0}")]
    Kv(#[from] KvError),

    /// Indexed store failure, propagated.
    #[error("indexed store error: {0}")]
    Index(#[from] IndexError),

    /// Record payload (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ModelError> for RepoError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Projection(msg) => Self::Projection(msg),
            ModelError::Serialization(e) => Self::Serialization(e),
        }
    }
}
