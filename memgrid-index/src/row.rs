use memgrid_types::RecordId;
use serde_json::{Map, Value};

/// One indexed-store row: the lite projection of a record.
///
/// `fields` holds only the indexed field set — system-managed columns live
/// beside it, never inside it, so an indexed row is always a strict field
/// subset of the full record under the same identity.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteRow {
    /// Record identity, assigned on insert.
    pub id: RecordId,
    /// Indexed field values as a JSON document.
    pub fields: Map<String, Value>,
    /// Creation time, epoch millis.
    pub created_at: i64,
    /// Last update time, epoch millis.
    pub updated_at: i64,
    /// Soft-delete marker; set rows are hidden from default reads.
    pub deleted_at: Option<i64>,
    /// Revision counter, bumped on every field update.
    pub revision: i64,
}

impl LiteRow {
    /// True when the row is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
