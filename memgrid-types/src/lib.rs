//! Shared primitive types for the MemGrid storage layer.
//!
//! - [`RecordId`] — time-ordered unique record identity (UUID v7)
//! - [`now_millis`] — epoch-millis clock used for audit timestamps
//!
//! Every other MemGrid crate depends on these; this crate depends on nothing
//! internal so the identity type can cross store boundaries freely.

mod ids;
mod time;

pub use ids::RecordId;
pub use time::now_millis;
