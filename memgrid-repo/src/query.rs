//! Typed query cursor over the dual storage.
//!
//! Wraps the indexed store's query builder so terminal operations do the
//! cross-store work: fetches hydrate full records (via the value store, or
//! directly from the index for full-fidelity pairings) and deletes clean the
//! value store up after the index.

use crate::coordinator::SyncCoordinator;
use crate::error::RepoResult;
use memgrid_index::{Filter, IndexQuery, SortDir};
use memgrid_model::FullRecord;
use memgrid_types::RecordId;
use std::sync::Arc;
use tracing::warn;

/// A filtered, sorted, paginated query returning typed records.
pub struct RecordQuery<F: FullRecord> {
    coordinator: Arc<SyncCoordinator<F>>,
    inner: IndexQuery,
}

impl<F: FullRecord> RecordQuery<F> {
    pub(crate) fn new(coordinator: Arc<SyncCoordinator<F>>, inner: IndexQuery) -> Self {
        Self { coordinator, inner }
    }

    /// Replaces the filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.inner = self.inner.filter(filter);
        self
    }

    /// Sorts by a meta column or indexed field.
    #[must_use]
    pub fn sort(mut self, field: &str, dir: SortDir) -> Self {
        self.inner = self.inner.sort(field, dir);
        self
    }

    /// Skips the first `n` matching records.
    #[must_use]
    pub fn skip(mut self, n: u64) -> Self {
        self.inner = self.inner.skip(n);
        self
    }

    /// Caps the result at `n` records.
    #[must_use]
    pub fn limit(mut self, n: u64) -> Self {
        self.inner = self.inner.limit(n);
        self
    }

    /// Includes soft-deleted records ("hard" query variant).
    #[must_use]
    pub fn include_deleted(mut self) -> Self {
        self.inner = self.inner.include_deleted();
        self
    }

    /// Executes the query and hydrates full records.
    ///
    /// Full-fidelity pairings are rebuilt straight from the index rows;
    /// projected pairings go through one batched value-store read, dropping
    /// rows whose payload is missing or unreadable.
    pub async fn to_records(&self) -> RepoResult<Vec<F>> {
        let rows = self.inner.fetch()?;
        if F::INDEX_HAS_FULL_FIDELITY {
            rows.iter()
                .map(|row| self.coordinator.full_from_row(row))
                .collect()
        } else {
            self.coordinator.reconstruct_batch(&rows).await
        }
    }

    /// Executes the query and returns lite records, no value-store access.
    pub fn to_lites(&self) -> RepoResult<Vec<F::Lite>> {
        self.inner
            .fetch()?
            .iter()
            .map(|row| self.coordinator.lite_from_row(row))
            .collect()
    }

    /// Matching identities only.
    pub fn ids(&self) -> RepoResult<Vec<RecordId>> {
        Ok(self.inner.ids()?)
    }

    /// Number of matching records.
    pub fn count(&self) -> RepoResult<u64> {
        Ok(self.inner.count()?)
    }

    /// Soft-deletes every matching record and removes its value payload.
    ///
    /// The identities are captured before the index rows are marked (marked
    /// rows no longer match a live query). Value-store cleanup is
    /// best-effort: a failure there is logged, not returned, since the index
    /// already reflects the delete.
    pub async fn delete(&self) -> RepoResult<u64> {
        let ids = self.inner.ids()?;
        if ids.is_empty() {
            return Ok(0);
        }
        let removed = self.inner.delete()?;
        self.cleanup_values(&ids).await;
        Ok(removed)
    }

    /// Physically deletes every matching record, soft-deleted ones included,
    /// along with any value payloads.
    pub async fn hard_delete(&self) -> RepoResult<u64> {
        let ids = self.inner.clone().include_deleted().ids()?;
        let removed = self.inner.hard_delete()?;
        if !ids.is_empty() {
            self.cleanup_values(&ids).await;
        }
        Ok(removed)
    }

    async fn cleanup_values(&self, ids: &[RecordId]) {
        let keys: Vec<String> = ids.iter().map(RecordId::to_string).collect();
        if let Err(e) = self.coordinator.kv().batch_delete(&keys).await {
            warn!(kind = F::KIND, count = keys.len(), error = %e,
                "value store cleanup failed after index delete");
        }
    }
}
