use memgrid_types::RecordId;
use serde::{Deserialize, Serialize};

/// Field names managed by the storage layer itself.
///
/// These are subtracted from the lite schema's declared field list when the
/// indexed field set is computed: identity and audit stamps are assigned by
/// the indexed store, never copied as domain data.
pub const SYSTEM_FIELDS: [&str; 5] = ["id", "created_at", "updated_at", "deleted_at", "revision"];

/// System-managed portion of a record.
///
/// Embedded in full and lite structs with `#[serde(flatten)]` so the fields
/// appear as top-level JSON keys in both the value-store payload and the
/// indexed row. Everything is optional: a freshly constructed record has no
/// identity or timestamps until the indexed store assigns them on insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Identity assigned by the indexed store on first insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Creation time, epoch millis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    /// Last update time, epoch millis. Auto-refreshed by the indexed store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,

    /// Soft-delete marker. Set rows are excluded from default queries but
    /// remain physically present until a hard delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,

    /// Optimistic revision counter, bumped on every indexed-store update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
}

impl RecordMeta {
    /// True once the indexed store has assigned an identity.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
