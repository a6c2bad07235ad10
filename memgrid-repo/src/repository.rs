//! The generic repository surface.

use crate::Patch;
use crate::coordinator::SyncCoordinator;
use crate::error::RepoResult;
use crate::proxy::RecordAccess;
use crate::query::RecordQuery;
use memgrid_index::{Filter, IndexedStore, SortDir};
use memgrid_kv::KvStore;
use memgrid_model::FullRecord;
use memgrid_types::RecordId;
use std::sync::Arc;

/// Uniform CRUD and query operations for one (full, lite) record pairing.
///
/// Construct one per record kind; stores are injected, so repositories for
/// different kinds can share the same underlying stores.
pub struct Repository<F: FullRecord> {
    coordinator: Arc<SyncCoordinator<F>>,
    access: RecordAccess<F>,
}

impl<F: FullRecord> Repository<F> {
    pub fn new(index: IndexedStore, kv: Arc<dyn KvStore>) -> Self {
        let coordinator = Arc::new(SyncCoordinator::new(index, kv));
        let access = RecordAccess::new(Arc::clone(&coordinator));
        Self {
            coordinator,
            access,
        }
    }

    /// Persists a new record, returning it with identity and audit stamps.
    pub async fn create(&self, record: F) -> RepoResult<F> {
        self.coordinator.append(record).await
    }

    /// Loads a record by identity, read-through with index fallback.
    pub async fn get_by_id(&self, id: RecordId) -> RepoResult<Option<F>> {
        self.access.get_by_id(id).await
    }

    /// Applies a by-name patch to an existing record. System fields in the
    /// patch are ignored.
    pub async fn update_by_id(&self, id: RecordId, patch: &Patch) -> RepoResult<F> {
        self.coordinator.update_by_id(id, patch).await
    }

    /// Soft-deletes a record, removing its value payload. Returns true when
    /// a live record was deleted.
    pub async fn delete_by_id(&self, id: RecordId) -> RepoResult<bool> {
        self.coordinator.delete_by_id(id).await
    }

    /// Starts a query over this record kind.
    #[must_use]
    pub fn find(&self) -> RecordQuery<F> {
        self.access.find()
    }

    /// One-shot filtered fetch with pagination and sort.
    pub async fn find_by_filter(
        &self,
        filter: Filter,
        skip: Option<u64>,
        limit: Option<u64>,
        sort_field: &str,
        sort_desc: bool,
    ) -> RepoResult<Vec<F>> {
        let dir = if sort_desc { SortDir::Desc } else { SortDir::Asc };
        let mut query = self.find().filter(filter).sort(sort_field, dir);
        if let Some(n) = skip {
            query = query.skip(n);
        }
        if let Some(n) = limit {
            query = query.limit(n);
        }
        query.to_records().await
    }

    /// Soft-deletes every record matching the filter.
    pub async fn delete_by_filter(&self, filter: Filter) -> RepoResult<u64> {
        self.access.delete_many(filter).await
    }

    /// Physically deletes every matching record, soft-deleted ones included.
    pub async fn hard_delete_by_filter(&self, filter: Filter) -> RepoResult<u64> {
        self.access.hard_delete_many(filter).await
    }

    /// Clears the soft-delete marker on matching records.
    pub async fn restore_by_filter(&self, filter: Filter) -> RepoResult<u64> {
        self.access.restore_many(filter).await
    }

    /// The indexed field set for this pairing.
    #[must_use]
    pub fn indexed_fields(&self) -> &[&'static str] {
        self.coordinator.projector().indexed_fields()
    }
}
