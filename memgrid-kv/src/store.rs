use crate::error::KvResult;
use async_trait::async_trait;
use std::collections::HashMap;

/// Key/value contract consumed by the repository layer.
///
/// Keys are record identities in string form; values are opaque serialized
/// payloads. Implementations must make every operation idempotent:
/// overwriting an existing key succeeds, deleting a missing key succeeds.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads the payload for a key, `None` on miss.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Writes (or overwrites) the payload for a key.
    async fn put(&self, key: &str, value: &str) -> KvResult<()>;

    /// Deletes a key. Succeeds even if the key does not exist.
    async fn delete(&self, key: &str) -> KvResult<()>;

    /// Reads many keys in one call. Missing keys are simply absent from the
    /// returned map, never an error.
    async fn batch_get(&self, keys: &[String]) -> KvResult<HashMap<String, String>>;

    /// Deletes many keys in one call. Missing keys are ignored.
    async fn batch_delete(&self, keys: &[String]) -> KvResult<()>;
}
