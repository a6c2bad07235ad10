//! Dual-storage generic repository for MemGrid.
//!
//! Keeps two heterogeneous stores consistent under CRUD while presenting a
//! single logical record to callers:
//!
//! - the **indexed store** holds a reduced projection of each record
//!   (indexed fields + audit metadata) and answers filtered queries
//! - the **value store** holds the full-fidelity serialized record, keyed by
//!   identity, and answers fast single-record reads
//!
//! # Architecture
//!
//! - [`SyncCoordinator`] orchestrates the non-transactional dual writes and
//!   defines the failure policy for the gap between the stores
//! - [`RecordAccess`] is the read-through facade: value store first, indexed
//!   store fallback with backfill
//! - [`RecordQuery`] wraps the indexed store's query cursor so hydration and
//!   value-store cleanup happen on terminal operations
//! - [`Repository`] composes the above behind uniform CRUD + query
//!   operations, parameterized by a ([`FullRecord`], lite) schema pairing
//!
//! There is no transaction manager and no atomic multi-store commit. The one
//! accepted inconsistency window (an index row whose value write failed) is
//! surfaced as [`RepoError::PartialWrite`] carrying the assigned identity.
//!
//! [`FullRecord`]: memgrid_model::FullRecord

mod coordinator;
mod error;
mod proxy;
mod query;
mod repository;

pub use coordinator::SyncCoordinator;
pub use error::{RepoError, RepoResult};
pub use proxy::RecordAccess;
pub use query::RecordQuery;
pub use repository::Repository;

pub use memgrid_index::{Filter, IndexedStore, LiteRow, SortDir};
pub use memgrid_kv::KvStore;
pub use memgrid_model::{FullRecord, LiteRecord, RecordMeta};
pub use memgrid_types::RecordId;

/// By-name field patch applied by [`Repository::update_by_id`].
pub type Patch = serde_json::Map<String, serde_json::Value>;
