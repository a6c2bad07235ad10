//! Audit clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as milliseconds since the Unix epoch.
///
/// All audit timestamps (`created_at`, `updated_at`, `deleted_at`) use this
/// representation so they serialize as plain JSON numbers and compare
/// cheaply inside the indexed store.
#[must_use]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before Unix epoch")
        .as_millis() as i64
}
