//! Indexed store for MemGrid.
//!
//! Holds the lite projection of every record — a JSON document of indexed
//! fields plus system-managed audit columns — in a single SQLite table,
//! partitioned by record kind. The store assigns identities (UUID v7) and
//! audit timestamps on insert, auto-refreshes `updated_at` and bumps the
//! revision on every update, and filters soft-deleted rows out of default
//! reads. "Hard" variants bypass the soft-delete filter.
//!
//! Queries are equality filters over indexed fields (executed natively via
//! `json_extract`) with sort, skip and limit. There is no query planner
//! beyond what SQLite provides.

mod error;
mod query;
mod row;
mod store;

pub use error::{IndexError, IndexResult};
pub use query::{Filter, IndexQuery, SortDir};
pub use row::LiteRow;
pub use store::IndexedStore;
