//! DuckDB-backed value store.
//!
//! One table, one row per record. The connection is shared behind a mutex so
//! the store can be cloned across repositories for different record kinds.

use crate::error::{KvError, KvResult};
use crate::store::KvStore;
use async_trait::async_trait;
use duckdb::{Connection, params, params_from_iter};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Persistent value store over DuckDB.
#[derive(Clone)]
pub struct DuckDbKvStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbKvStore {
    /// Opens (or creates) a value store at the given path.
    pub fn open(path: &Path) -> KvResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| KvError::Unavailable(format!("failed to open {}: {e}", path.display())))?;
        Self::open_with_conn(Arc::new(Mutex::new(conn)))
    }

    /// Opens an in-memory value store.
    pub fn open_in_memory() -> KvResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| KvError::Unavailable(format!("failed to open in-memory store: {e}")))?;
        Self::open_with_conn(Arc::new(Mutex::new(conn)))
    }

    /// Wraps an existing shared connection.
    pub fn open_with_conn(conn: Arc<Mutex<Connection>>) -> KvResult<Self> {
        let store = Self { conn };
        store.ensure_table()?;
        Ok(store)
    }

    fn ensure_table(&self) -> KvResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_entries (
                record_key TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                stored_at BIGINT NOT NULL
            )",
        )
        .map_err(|e| KvError::Storage(e.to_string()))
    }

    fn lock(&self) -> KvResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| KvError::Storage(format!("connection lock poisoned: {e}")))
    }

    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis() as i64
    }

    fn placeholders(n: usize) -> String {
        vec!["?"; n].join(", ")
    }
}

#[async_trait]
impl KvStore for DuckDbKvStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT payload FROM kv_entries WHERE record_key = ?")
            .map_err(|e| KvError::Storage(e.to_string()))?;
        let mut rows = stmt
            .query(params![key])
            .map_err(|e| KvError::Storage(e.to_string()))?;
        match rows.next().map_err(|e| KvError::Storage(e.to_string()))? {
            Some(row) => {
                let payload: String = row.get(0).map_err(|e| KvError::Storage(e.to_string()))?;
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str) -> KvResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO kv_entries (record_key, payload, stored_at) VALUES (?, ?, ?)",
            params![key, value, Self::now_millis()],
        )
        .map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM kv_entries WHERE record_key = ?",
            params![key],
        )
        .map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn batch_get(&self, keys: &[String]) -> KvResult<HashMap<String, String>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let conn = self.lock()?;
        let sql = format!(
            "SELECT record_key, payload FROM kv_entries WHERE record_key IN ({})",
            Self::placeholders(keys.len())
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| KvError::Storage(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(keys.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| KvError::Storage(e.to_string()))?;

        let mut out = HashMap::with_capacity(keys.len());
        for row in rows {
            let (key, payload) = row.map_err(|e| KvError::Storage(e.to_string()))?;
            out.insert(key, payload);
        }
        Ok(out)
    }

    async fn batch_delete(&self, keys: &[String]) -> KvResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let conn = self.lock()?;
        let sql = format!(
            "DELETE FROM kv_entries WHERE record_key IN ({})",
            Self::placeholders(keys.len())
        );
        conn.execute(&sql, params_from_iter(keys.iter()))
            .map_err(|e| KvError::Storage(e.to_string()))?;
        Ok(())
    }
}
