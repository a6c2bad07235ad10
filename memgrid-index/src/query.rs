//! Filtered, sorted, paginated queries over the indexed store.
//!
//! [`IndexQuery`] is a builder: `filter`/`sort`/`skip`/`limit` refine the
//! query, terminal operations execute it. Default queries exclude
//! soft-deleted rows; `include_deleted` lifts that filter ("hard" variant).

use crate::error::{IndexError, IndexResult};
use crate::row::LiteRow;
use crate::store::IndexedStore;
use memgrid_types::RecordId;
use serde_json::Value;
use std::collections::BTreeMap;

/// Columns stored beside the fields document rather than inside it.
const META_COLUMNS: [&str; 5] = ["id", "created_at", "updated_at", "deleted_at", "revision"];

/// Equality-AND filter over indexed fields and meta columns.
///
/// Values must be scalars (string, number, bool, or null for "is absent");
/// arrays and objects are rejected at execution time.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: BTreeMap<String, Value>,
}

impl Filter {
    /// Creates an empty filter matching every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality clause.
    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses.insert(field.to_string(), value.into());
        self
    }

    /// True when no clauses are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub(crate) fn clauses(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.clauses.iter()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeletedScope {
    LiveOnly,
    All,
    DeletedOnly,
}

/// A query over one record kind.
#[derive(Clone)]
pub struct IndexQuery {
    store: IndexedStore,
    kind: String,
    filter: Filter,
    sort: Option<(String, SortDir)>,
    skip: Option<u64>,
    limit: Option<u64>,
    include_deleted: bool,
}

impl IndexQuery {
    pub(crate) fn new(store: IndexedStore, kind: &str) -> Self {
        Self {
            store,
            kind: kind.to_string(),
            filter: Filter::new(),
            sort: None,
            skip: None,
            limit: None,
            include_deleted: false,
        }
    }

    /// Replaces the filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Sorts by a meta column or indexed field.
    #[must_use]
    pub fn sort(mut self, field: &str, dir: SortDir) -> Self {
        self.sort = Some((field.to_string(), dir));
        self
    }

    /// Skips the first `n` matching rows.
    #[must_use]
    pub fn skip(mut self, n: u64) -> Self {
        self.skip = Some(n);
        self
    }

    /// Caps the result at `n` rows.
    #[must_use]
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Includes soft-deleted rows in the result ("hard" query variant).
    #[must_use]
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    fn scope(&self) -> DeletedScope {
        if self.include_deleted {
            DeletedScope::All
        } else {
            DeletedScope::LiveOnly
        }
    }

    /// Executes the query and returns the matching rows.
    pub fn fetch(&self) -> IndexResult<Vec<LiteRow>> {
        self.fetch_scope(self.scope())
    }

    /// Executes the query and returns only the matching identities.
    pub fn ids(&self) -> IndexResult<Vec<RecordId>> {
        Ok(self.fetch()?.into_iter().map(|row| row.id).collect())
    }

    /// Number of matching rows, honoring skip/limit.
    pub fn count(&self) -> IndexResult<u64> {
        Ok(self.fetch()?.len() as u64)
    }

    /// Soft-deletes every matching row. Returns the number of rows marked.
    pub fn delete(&self) -> IndexResult<u64> {
        let ids = self.ids()?;
        self.store.soft_delete_ids(&self.kind, &ids)
    }

    /// Physically deletes every matching row, soft-deleted ones included.
    pub fn hard_delete(&self) -> IndexResult<u64> {
        let ids: Vec<RecordId> = self
            .fetch_scope(DeletedScope::All)?
            .into_iter()
            .map(|row| row.id)
            .collect();
        self.store.hard_delete_ids(&self.kind, &ids)
    }

    /// Clears the soft-delete marker on matching soft-deleted rows.
    pub fn restore(&self) -> IndexResult<u64> {
        let ids: Vec<RecordId> = self
            .fetch_scope(DeletedScope::DeletedOnly)?
            .into_iter()
            .map(|row| row.id)
            .collect();
        self.store.restore_ids(&self.kind, &ids)
    }

    fn fetch_scope(&self, scope: DeletedScope) -> IndexResult<Vec<LiteRow>> {
        let (sql, params) = self.build_select(scope)?;
        self.store.run_select(&sql, params)
    }

    fn build_select(
        &self,
        scope: DeletedScope,
    ) -> IndexResult<(String, Vec<rusqlite::types::Value>)> {
        let mut sql = String::from(
            "SELECT id, fields, created_at, updated_at, deleted_at, revision \
             FROM lite_records WHERE kind = ?",
        );
        let mut params: Vec<rusqlite::types::Value> =
            vec![rusqlite::types::Value::Text(self.kind.clone())];

        match scope {
            DeletedScope::LiveOnly => sql.push_str(" AND deleted_at IS NULL"),
            DeletedScope::DeletedOnly => sql.push_str(" AND deleted_at IS NOT NULL"),
            DeletedScope::All => {}
        }

        for (field, value) in self.filter.clauses() {
            let expr = column_expr(field)?;
            if value.is_null() {
                sql.push_str(&format!(" AND {expr} IS NULL"));
            } else {
                sql.push_str(&format!(" AND {expr} = ?"));
                params.push(scalar_param(field, value)?);
            }
        }

        if let Some((field, dir)) = &self.sort {
            let expr = column_expr(field)?;
            let dir = match dir {
                SortDir::Asc => "ASC",
                SortDir::Desc => "DESC",
            };
            // Tie-break on id so pagination is deterministic; v7 identities
            // follow insertion order.
            sql.push_str(&format!(" ORDER BY {expr} {dir}, id ASC"));
        }

        if self.limit.is_some() || self.skip.is_some() {
            // SQLite requires LIMIT before OFFSET; -1 means unbounded.
            let limit = self.limit.map_or(-1, |n| n as i64);
            sql.push_str(" LIMIT ?");
            params.push(rusqlite::types::Value::Integer(limit));
            if let Some(skip) = self.skip {
                sql.push_str(" OFFSET ?");
                params.push(rusqlite::types::Value::Integer(skip as i64));
            }
        }

        Ok((sql, params))
    }
}

/// SQL expression addressing a filterable/sortable column.
///
/// Meta columns are addressed directly; indexed fields go through
/// `json_extract` on the fields document. Field names are restricted to
/// identifier characters, so interpolation is safe.
fn column_expr(field: &str) -> IndexResult<String> {
    if !is_identifier(field) {
        return Err(IndexError::InvalidQuery(format!(
            "invalid field name: {field:?}"
        )));
    }
    if META_COLUMNS.contains(&field) {
        Ok(field.to_string())
    } else {
        Ok(format!("json_extract(fields, '$.{field}')"))
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn scalar_param(field: &str, value: &Value) -> IndexResult<rusqlite::types::Value> {
    match value {
        Value::Bool(b) => Ok(rusqlite::types::Value::Integer(i64::from(*b))),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(rusqlite::types::Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(rusqlite::types::Value::Real(f))
            } else {
                Err(IndexError::InvalidQuery(format!(
                    "unrepresentable number in filter on {field:?}"
                )))
            }
        }
        Value::String(s) => Ok(rusqlite::types::Value::Text(s.clone())),
        other => Err(IndexError::InvalidQuery(format!(
            "filter on {field:?} must be a scalar, got {other}"
        ))),
    }
}
