//! Shared fixtures: two record pairings and a fault-injecting value store.

// Not every test binary touches every fixture.
#![allow(dead_code)]

use async_trait::async_trait;
use memgrid_kv::{KvError, KvResult, KvStore, MemoryKvStore};
use memgrid_model::{FullRecord, LiteRecord, RecordMeta};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Projected pairing: the lite schema covers only part of the domain fields,
/// so the index alone cannot rebuild a full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCell {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub user_id: Option<String>,
    pub timestamp: i64,
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCellLite {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl LiteRecord for MemoryCellLite {
    const FIELDS: &'static [&'static str] = &["id", "user_id", "timestamp", "summary"];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

impl FullRecord for MemoryCell {
    type Lite = MemoryCellLite;
    const KIND: &'static str = "memory_cell";

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

pub fn cell(user: &str, timestamp: i64, summary: &str) -> MemoryCell {
    MemoryCell {
        meta: RecordMeta::default(),
        user_id: Some(user.to_string()),
        timestamp,
        summary: Some(summary.to_string()),
        keywords: None,
        episode: None,
    }
}

/// Full-fidelity pairing: the lite schema covers every domain field, so the
/// index can rebuild full records without the value store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

pub type NoteLite = Note;

impl LiteRecord for Note {
    const FIELDS: &'static [&'static str] = &["id", "title", "body"];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

impl FullRecord for Note {
    type Lite = NoteLite;
    const KIND: &'static str = "note";
    const INDEX_HAS_FULL_FIDELITY: bool = true;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

pub fn note(title: &str, body: &str) -> Note {
    Note {
        meta: RecordMeta::default(),
        title: Some(title.to_string()),
        body: Some(body.to_string()),
    }
}

/// Value store that fails selected operations on demand, delegating the rest
/// to an in-memory store.
#[derive(Debug, Default)]
pub struct FlakyKv {
    pub inner: MemoryKvStore,
    pub fail_put: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_batch_delete: AtomicBool,
}

impl FlakyKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_batch_delete(&self, fail: bool) {
        self.fail_batch_delete.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KvStore for FlakyKv {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> KvResult<()> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(KvError::Storage("injected put failure".to_string()));
        }
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(KvError::Storage("injected delete failure".to_string()));
        }
        self.inner.delete(key).await
    }

    async fn batch_get(&self, keys: &[String]) -> KvResult<HashMap<String, String>> {
        self.inner.batch_get(keys).await
    }

    async fn batch_delete(&self, keys: &[String]) -> KvResult<()> {
        if self.fail_batch_delete.load(Ordering::SeqCst) {
            return Err(KvError::Storage("injected batch delete failure".to_string()));
        }
        self.inner.batch_delete(keys).await
    }
}
