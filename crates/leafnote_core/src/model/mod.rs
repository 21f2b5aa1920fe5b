//! Persisted domain records.
//!
//! # Responsibility
//! - Define the page/folder/settings shapes written to the key-value store.
//!
//! # Invariants
//! - Every page and folder is identified by a stable UUID.
//! - Timestamps are unix epoch milliseconds.
//! - Record JSON uses camelCase field names.

pub mod folder;
pub mod page;
pub mod settings;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in epoch milliseconds.
///
/// Falls back to `0` if the system clock is before the unix epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
