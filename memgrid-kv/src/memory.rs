//! In-memory value store.

use crate::error::{KvError, KvResult};
use crate::store::KvStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Map-backed value store for tests and embedded single-process use.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> KvResult<usize> {
        Ok(self.read()?.len())
    }

    /// True when the store holds no entries.
    pub fn is_empty(&self) -> KvResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> KvResult<std::sync::RwLockReadGuard<'_, HashMap<String, String>>> {
        self.entries
            .read()
            .map_err(|e| KvError::Storage(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> KvResult<std::sync::RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.entries
            .write()
            .map_err(|e| KvError::Storage(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> KvResult<()> {
        self.write()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        self.write()?.remove(key);
        Ok(())
    }

    async fn batch_get(&self, keys: &[String]) -> KvResult<HashMap<String, String>> {
        let entries = self.read()?;
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    async fn batch_delete(&self, keys: &[String]) -> KvResult<()> {
        let mut entries = self.write()?;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
