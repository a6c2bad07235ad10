//! Value store adapter for MemGrid.
//!
//! The value store holds the full-fidelity serialized record, keyed by the
//! record identity's string form. It is schema-agnostic: payloads are opaque
//! strings, and the adapter has no knowledge of what they contain.
//!
//! [`KvStore`] is the seam the repository layer depends on. Two
//! implementations ship here:
//! - [`DuckDbKvStore`] — persistent, DuckDB-backed
//! - [`MemoryKvStore`] — in-process map, for tests and embedded use
//!
//! All operations are idempotent; deleting a missing key succeeds, and batch
//! gets simply omit missing keys.

mod duckdb_store;
mod error;
mod memory;
mod store;

pub use duckdb_store::DuckDbKvStore;
pub use error::{KvError, KvResult};
pub use memory::MemoryKvStore;
pub use store::KvStore;
