//! Read-through record access over both stores.

use crate::coordinator::SyncCoordinator;
use crate::error::RepoResult;
use crate::query::RecordQuery;
use memgrid_index::Filter;
use memgrid_model::FullRecord;
use memgrid_types::RecordId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-side facade: value store first, indexed store as fallback.
pub struct RecordAccess<F: FullRecord> {
    coordinator: Arc<SyncCoordinator<F>>,
}

impl<F: FullRecord> RecordAccess<F> {
    pub(crate) fn new(coordinator: Arc<SyncCoordinator<F>>) -> Self {
        Self { coordinator }
    }

    /// Loads a record by identity.
    ///
    /// The value store is consulted first. On a miss (or an unreadable
    /// payload) the live index row is the fallback: for full-fidelity
    /// pairings the record is rebuilt from the row and the value store is
    /// backfilled; for projected pairings the index alone cannot rebuild the
    /// record, so the result is `None`.
    pub async fn get_by_id(&self, id: RecordId) -> RepoResult<Option<F>> {
        let key = id.to_string();
        if let Some(payload) = self.coordinator.kv().get(&key).await? {
            match serde_json::from_str::<F>(&payload) {
                Ok(record) => return Ok(Some(record)),
                Err(e) => {
                    warn!(kind = F::KIND, %id, error = %e,
                        "unreadable value payload, falling back to index");
                }
            }
        }

        let Some(row) = self.coordinator.index().get(F::KIND, id)? else {
            return Ok(None);
        };

        if !F::INDEX_HAS_FULL_FIDELITY {
            debug!(kind = F::KIND, %id,
                "index row exists but projection cannot rebuild the record");
            return Ok(None);
        }

        let record = self.coordinator.full_from_row(&row)?;
        match serde_json::to_string(&record) {
            Ok(payload) => {
                if let Err(e) = self.coordinator.kv().put(&key, &payload).await {
                    warn!(kind = F::KIND, %id, error = %e, "value store backfill failed");
                }
            }
            Err(e) => warn!(kind = F::KIND, %id, error = %e, "could not serialize backfill"),
        }
        Ok(Some(record))
    }

    /// Starts a query over this record kind.
    #[must_use]
    pub fn find(&self) -> RecordQuery<F> {
        RecordQuery::new(
            Arc::clone(&self.coordinator),
            self.coordinator.index().find(F::KIND),
        )
    }

    /// Soft-deletes every record matching the filter. Index rows are marked;
    /// value payloads are removed best-effort.
    pub async fn delete_many(&self, filter: Filter) -> RepoResult<u64> {
        self.find().filter(filter).delete().await
    }

    /// Physically deletes every matching record, soft-deleted ones included.
    pub async fn hard_delete_many(&self, filter: Filter) -> RepoResult<u64> {
        self.find().filter(filter).hard_delete().await
    }

    /// Clears the soft-delete marker on matching records.
    ///
    /// For full-fidelity pairings the value payloads are rebuilt from the
    /// restored index rows (delete removed them). Projected pairings get
    /// their index rows back but their payloads are gone for good, which is
    /// logged.
    pub async fn restore_many(&self, filter: Filter) -> RepoResult<u64> {
        let query = self
            .coordinator
            .index()
            .find(F::KIND)
            .filter(filter.clone());
        let restored = query.restore()?;
        if restored == 0 {
            return Ok(0);
        }

        if !F::INDEX_HAS_FULL_FIDELITY {
            warn!(kind = F::KIND, restored,
                "restored index rows but value payloads cannot be rebuilt from a projection");
            return Ok(restored);
        }

        // Rows are live again; rebuild their payloads.
        let rows = self.coordinator.index().find(F::KIND).filter(filter).fetch()?;
        for row in &rows {
            let record = self.coordinator.full_from_row(row)?;
            let payload = serde_json::to_string(&record)?;
            if let Err(e) = self.coordinator.kv().put(&row.id.to_string(), &payload).await {
                warn!(kind = F::KIND, id = %row.id, error = %e,
                    "value store rebuild failed for restored record");
            }
        }
        debug!(kind = F::KIND, restored, "restored records");
        Ok(restored)
    }
}
