use crate::error::{IndexError, IndexResult};
use crate::query::IndexQuery;
use crate::row::LiteRow;
use memgrid_types::{RecordId, now_millis};
use rusqlite::{Connection, params, params_from_iter};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// SQLite-backed indexed store.
///
/// Cheap to clone; clones share the underlying connection, so repositories
/// for different record kinds can hold the same store.
#[derive(Clone)]
pub struct IndexedStore {
    conn: Arc<Mutex<Connection>>,
}

impl IndexedStore {
    /// Opens (or creates) an indexed store at the given path.
    pub fn open(path: &Path) -> IndexResult<Self> {
        let conn = Connection::open(path)?;
        Self::open_with_conn(Arc::new(Mutex::new(conn)))
    }

    /// Opens an in-memory indexed store.
    pub fn open_in_memory() -> IndexResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::open_with_conn(Arc::new(Mutex::new(conn)))
    }

    /// Wraps an existing shared connection.
    pub fn open_with_conn(conn: Arc<Mutex<Connection>>) -> IndexResult<Self> {
        let store = Self { conn };
        store.ensure_table()?;
        Ok(store)
    }

    fn ensure_table(&self) -> IndexResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS lite_records (
                id TEXT NOT NULL,
                kind TEXT NOT NULL,
                fields TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                deleted_at INTEGER,
                revision INTEGER NOT NULL,
                PRIMARY KEY (kind, id)
            );
            CREATE INDEX IF NOT EXISTS idx_lite_records_kind_created
                ON lite_records (kind, created_at);",
        )?;
        Ok(())
    }

    fn lock(&self) -> IndexResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| IndexError::Storage(format!("connection lock poisoned: {e}")))
    }

    /// Inserts a new lite row, assigning identity and audit timestamps.
    pub fn insert(&self, kind: &str, fields: &Map<String, Value>) -> IndexResult<LiteRow> {
        let id = RecordId::new();
        let now = now_millis();
        let fields_json = serde_json::to_string(fields)
            .map_err(|e| IndexError::InvalidData(e.to_string()))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO lite_records (id, kind, fields, created_at, updated_at, deleted_at, revision)
             VALUES (?, ?, ?, ?, ?, NULL, 0)",
            params![id.to_string(), kind, fields_json, now, now],
        )?;
        debug!(kind, %id, "inserted lite row");

        Ok(LiteRow {
            id,
            fields: fields.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            revision: 0,
        })
    }

    /// Loads a live row by identity. Soft-deleted rows are invisible here.
    pub fn get(&self, kind: &str, id: RecordId) -> IndexResult<Option<LiteRow>> {
        self.get_row(kind, id, false)
    }

    /// Loads a row by identity, soft-deleted or not ("hard" variant).
    pub fn hard_get(&self, kind: &str, id: RecordId) -> IndexResult<Option<LiteRow>> {
        self.get_row(kind, id, true)
    }

    fn get_row(&self, kind: &str, id: RecordId, include_deleted: bool) -> IndexResult<Option<LiteRow>> {
        let conn = self.lock()?;
        select_row(&conn, kind, id, include_deleted)
    }

    /// Merges the given field values into a live row's fields document,
    /// refreshing `updated_at` and bumping the revision.
    ///
    /// A `null` value clears the field from the document. Returns the
    /// refreshed row, or `None` when no live row has that identity.
    pub fn update_fields(
        &self,
        kind: &str,
        id: RecordId,
        changes: &Map<String, Value>,
    ) -> IndexResult<Option<LiteRow>> {
        // One lock for the whole read-modify-write so a concurrent delete
        // cannot slip in between.
        let conn = self.lock()?;
        let Some(mut row) = select_row(&conn, kind, id, false)? else {
            return Ok(None);
        };

        for (name, value) in changes {
            if value.is_null() {
                row.fields.remove(name);
            } else {
                row.fields.insert(name.clone(), value.clone());
            }
        }
        row.updated_at = now_millis();
        row.revision += 1;

        let fields_json = serde_json::to_string(&row.fields)
            .map_err(|e| IndexError::InvalidData(e.to_string()))?;
        conn.execute(
            "UPDATE lite_records SET fields = ?, updated_at = ?, revision = ?
             WHERE kind = ? AND id = ? AND deleted_at IS NULL",
            params![fields_json, row.updated_at, row.revision, kind, id.to_string()],
        )?;
        debug!(kind, %id, changed = changes.len(), "updated lite row fields");
        Ok(Some(row))
    }

    /// Soft-deletes a live row. Returns true when a row was marked.
    pub fn soft_delete(&self, kind: &str, id: RecordId) -> IndexResult<bool> {
        let now = now_millis();
        let conn = self.lock()?;
        let affected = conn.execute(
            "UPDATE lite_records SET deleted_at = ?, updated_at = ?
             WHERE kind = ? AND id = ? AND deleted_at IS NULL",
            params![now, now, kind, id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Starts a query over one record kind.
    #[must_use]
    pub fn find(&self, kind: &str) -> IndexQuery {
        IndexQuery::new(self.clone(), kind)
    }

    pub(crate) fn soft_delete_ids(&self, kind: &str, ids: &[RecordId]) -> IndexResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let now = now_millis();
        let sql = format!(
            "UPDATE lite_records SET deleted_at = ?, updated_at = ?
             WHERE kind = ? AND deleted_at IS NULL AND id IN ({})",
            placeholders(ids.len())
        );
        let conn = self.lock()?;
        let affected = conn.execute(&sql, params_from_iter(id_params(now, kind, ids)))?;
        Ok(affected as u64)
    }

    pub(crate) fn hard_delete_ids(&self, kind: &str, ids: &[RecordId]) -> IndexResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "DELETE FROM lite_records WHERE kind = ? AND id IN ({})",
            placeholders(ids.len())
        );
        let mut values = vec![rusqlite::types::Value::Text(kind.to_string())];
        values.extend(ids.iter().map(|id| rusqlite::types::Value::Text(id.to_string())));
        let conn = self.lock()?;
        let affected = conn.execute(&sql, params_from_iter(values))?;
        Ok(affected as u64)
    }

    pub(crate) fn restore_ids(&self, kind: &str, ids: &[RecordId]) -> IndexResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let now = now_millis();
        let sql = format!(
            "UPDATE lite_records SET deleted_at = NULL, updated_at = ?
             WHERE kind = ? AND deleted_at IS NOT NULL AND id IN ({})",
            placeholders(ids.len())
        );
        let mut values = vec![
            rusqlite::types::Value::Integer(now),
            rusqlite::types::Value::Text(kind.to_string()),
        ];
        values.extend(ids.iter().map(|id| rusqlite::types::Value::Text(id.to_string())));
        let conn = self.lock()?;
        let affected = conn.execute(&sql, params_from_iter(values))?;
        Ok(affected as u64)
    }

    pub(crate) fn run_select(
        &self,
        sql: &str,
        sql_params: Vec<rusqlite::types::Value>,
    ) -> IndexResult<Vec<LiteRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(sql_params))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(read_row(row)?);
        }
        Ok(out)
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn id_params(now: i64, kind: &str, ids: &[RecordId]) -> Vec<rusqlite::types::Value> {
    let mut values = vec![
        rusqlite::types::Value::Integer(now),
        rusqlite::types::Value::Integer(now),
        rusqlite::types::Value::Text(kind.to_string()),
    ];
    values.extend(ids.iter().map(|id| rusqlite::types::Value::Text(id.to_string())));
    values
}

fn select_row(
    conn: &Connection,
    kind: &str,
    id: RecordId,
    include_deleted: bool,
) -> IndexResult<Option<LiteRow>> {
    let mut sql = String::from(
        "SELECT id, fields, created_at, updated_at, deleted_at, revision \
         FROM lite_records WHERE kind = ? AND id = ?",
    );
    if !include_deleted {
        sql.push_str(" AND deleted_at IS NULL");
    }
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![kind, id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(read_row(row)?)),
        None => Ok(None),
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> IndexResult<LiteRow> {
    let id_text: String = row.get(0)?;
    let id = RecordId::parse(&id_text)
        .map_err(|e| IndexError::InvalidData(format!("bad record id {id_text:?}: {e}")))?;

    let fields_json: String = row.get(1)?;
    let fields: Map<String, Value> = serde_json::from_str(&fields_json)
        .map_err(|e| IndexError::InvalidData(format!("corrupt fields document for {id}: {e}")))?;

    Ok(LiteRow {
        id,
        fields,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
        deleted_at: row.get(4)?,
        revision: row.get(5)?,
    })
}
