//! Dual-write orchestration between the indexed store and the value store.
//!
//! Write ordering is the whole contract here:
//! - **append**: indexed store first (it assigns identity and audit stamps),
//!   then the value store. A value-store failure leaves the index row in
//!   place and surfaces [`RepoError::PartialWrite`] with the assigned id.
//! - **update**: value store first. If the full payload cannot be persisted
//!   the index keeps its previous, consistent projection.
//! - **delete**: value store first. A value-store failure aborts before the
//!   index row is touched, so the index never points at a payload that was
//!   not actually removed.

use crate::error::{RepoError, RepoResult};
use memgrid_index::{IndexedStore, LiteRow};
use memgrid_kv::KvStore;
use memgrid_model::{FieldProjector, FullRecord, RecordMeta, assemble};
use memgrid_types::RecordId;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Coordinates writes across the two stores for one record kind.
pub struct SyncCoordinator<F: FullRecord> {
    index: IndexedStore,
    kv: Arc<dyn KvStore>,
    projector: FieldProjector<F>,
}

impl<F: FullRecord> SyncCoordinator<F> {
    pub fn new(index: IndexedStore, kv: Arc<dyn KvStore>) -> Self {
        Self {
            index,
            kv,
            projector: FieldProjector::new(),
        }
    }

    /// Persists a new record to both stores.
    ///
    /// The indexed store assigns identity and audit stamps; those are copied
    /// back onto the returned record before the full payload is written to
    /// the value store. If the value write fails the index row stays (the
    /// record remains queryable) and the error carries the assigned identity
    /// so the caller can retry the value write.
    pub async fn append(&self, mut record: F) -> RepoResult<F> {
        let fields = self.projector.indexed_values(&record)?;
        let row = self.index.insert(F::KIND, &fields)?;

        let meta = record.meta_mut();
        meta.id = Some(row.id);
        meta.created_at = Some(row.created_at);
        meta.updated_at = Some(row.updated_at);
        meta.revision = Some(row.revision);

        let payload = serde_json::to_string(&record)?;
        if let Err(source) = self.kv.put(&row.id.to_string(), &payload).await {
            warn!(kind = F::KIND, id = %row.id, error = %source,
                "value store write failed after index insert");
            return Err(RepoError::PartialWrite { id: row.id, source });
        }
        info!(kind = F::KIND, id = %row.id, "appended record to both stores");
        Ok(record)
    }

    /// Applies a by-name patch to an existing record.
    ///
    /// The full payload is rewritten in the value store first; only then is
    /// the projection merged into the indexed store, which refreshes
    /// `updated_at` and bumps the revision. The refreshed audit stamps are
    /// copied onto the returned record without a second value-store write,
    /// so the stored payload carries the pre-update stamps. System fields in
    /// the patch are ignored.
    pub async fn update_by_id(&self, id: RecordId, patch: &Map<String, Value>) -> RepoResult<F> {
        let key = id.to_string();
        let payload = self
            .kv
            .get(&key)
            .await?
            .ok_or_else(|| RepoError::NotFound(key.clone()))?;
        let current: F = serde_json::from_str(&payload)?;
        let mut updated = memgrid_model::apply_patch(&current, patch)?;

        self.kv
            .put(&key, &serde_json::to_string(&updated)?)
            .await?;

        // Only the patched indexed fields move to the index; a patch that
        // sets one to null clears it there.
        let mut changes = Map::new();
        let source = serde_json::to_value(&updated)?;
        for name in self.projector.indexed_fields() {
            if patch.contains_key(*name) {
                let value = source.get(*name).cloned().unwrap_or(Value::Null);
                changes.insert((*name).to_string(), value);
            }
        }

        let row = self
            .index
            .update_fields(F::KIND, id, &changes)?
            .ok_or_else(|| RepoError::NotFound(key))?;

        let meta = updated.meta_mut();
        meta.updated_at = Some(row.updated_at);
        meta.revision = Some(row.revision);
        info!(kind = F::KIND, %id, revision = row.revision, "updated record");
        Ok(updated)
    }

    /// Removes a record from the value store and soft-deletes its index row.
    ///
    /// Returns true when the index row was live and is now marked deleted.
    /// A value-store failure propagates before the index is touched.
    pub async fn delete_by_id(&self, id: RecordId) -> RepoResult<bool> {
        self.kv.delete(&id.to_string()).await?;
        let removed = self.index.soft_delete(F::KIND, id)?;
        if removed {
            info!(kind = F::KIND, %id, "deleted record");
        } else {
            warn!(kind = F::KIND, %id, "delete found no live index row");
        }
        Ok(removed)
    }

    /// Hydrates full records for a batch of index rows with one value-store
    /// round trip.
    ///
    /// Rows whose payload is missing or unreadable are logged and dropped,
    /// never an error: a partial result beats failing the whole page.
    pub async fn reconstruct_batch(&self, rows: &[LiteRow]) -> RepoResult<Vec<F>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<String> = rows.iter().map(|row| row.id.to_string()).collect();
        let payloads = self.kv.batch_get(&keys).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            match payloads.get(&row.id.to_string()) {
                Some(payload) => match serde_json::from_str::<F>(payload) {
                    Ok(record) => out.push(record),
                    Err(e) => {
                        warn!(kind = F::KIND, id = %row.id, error = %e,
                            "dropping record with unreadable payload");
                    }
                },
                None => {
                    warn!(kind = F::KIND, id = %row.id,
                        "dropping index row with no value payload");
                }
            }
        }
        Ok(out)
    }

    /// Rebuilds a full record from an index row alone. Only meaningful for
    /// full-fidelity pairings, where the index carries every domain field.
    pub(crate) fn full_from_row(&self, row: &LiteRow) -> RepoResult<F> {
        Ok(assemble(&row_meta(row), &row.fields)?)
    }

    pub(crate) fn lite_from_row(&self, row: &LiteRow) -> RepoResult<F::Lite> {
        Ok(assemble(&row_meta(row), &row.fields)?)
    }

    pub(crate) fn index(&self) -> &IndexedStore {
        &self.index
    }

    pub(crate) fn kv(&self) -> &Arc<dyn KvStore> {
        &self.kv
    }

    /// The projector for this pairing.
    pub fn projector(&self) -> &FieldProjector<F> {
        &self.projector
    }
}

fn row_meta(row: &LiteRow) -> RecordMeta {
    RecordMeta {
        id: Some(row.id),
        created_at: Some(row.created_at),
        updated_at: Some(row.updated_at),
        deleted_at: row.deleted_at,
        revision: Some(row.revision),
    }
}
