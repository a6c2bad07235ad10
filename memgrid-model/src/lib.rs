//! Record model for MemGrid.
//!
//! Defines the contract between domain records and the dual-storage layer:
//! - [`RecordMeta`] — the system-managed audit block embedded in every record
//! - [`FullRecord`] / [`LiteRecord`] — the (full, lite) schema pairing traits
//! - [`FieldProjector`] — derives the indexed field set from the lite schema
//!   and copies field values between full and lite representations
//!
//! A "full" record is the complete domain object, serialized whole into the
//! value store. Its "lite" counterpart is the reduced projection held by the
//! indexed store purely for filtering and sorting. The pairing declares its
//! field names as a constant list, so the projection is computed once per
//! repository with no per-entity conversion code.

mod error;
mod meta;
mod projector;
mod record;

pub use error::{ModelError, ModelResult};
pub use meta::{RecordMeta, SYSTEM_FIELDS};
pub use projector::{FieldProjector, apply_patch, assemble};
pub use record::{FullRecord, LiteRecord};
