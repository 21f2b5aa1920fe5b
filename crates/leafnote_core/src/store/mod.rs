//! Key-value store contract used for every persisted record.
//!
//! # Responsibility
//! - Define the string-keyed get/set/delete contract pages, folders and
//!   settings are written through.
//! - Provide JSON record helpers on top of raw string values.
//!
//! # Invariants
//! - Values are stored as JSON text; the store itself never inspects them.
//! - `scan_prefix` returns entries sorted by key.
//! - A corrupt record never hides its neighbours: `scan_records` skips it.

use crate::db::DbError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory_store;
mod sqlite_store;

pub use memory_store::MemoryKvStore;
pub use sqlite_store::SqliteKvStore;

/// Key holding the singleton settings record.
pub const SETTINGS_KEY: &str = "settings";
/// Key prefix for page records.
pub const PAGE_KEY_PREFIX: &str = "page:";
/// Key prefix for folder records.
pub const FOLDER_KEY_PREFIX: &str = "folder:";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store backends and record codecs.
#[derive(Debug)]
pub enum StoreError {
    /// Backend database failure.
    Db(DbError),
    /// Record could not be encoded or decoded as JSON.
    Serialization {
        key: String,
        source: serde_json::Error,
    },
    /// Backend refused the operation (closed, read-only, simulated outage).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization { key, source } => {
                write!(f, "invalid record at `{key}`: {source}")
            }
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization { source, .. } => Some(source),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-keyed persistent store.
pub trait KvStore {
    /// Reads one raw value.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Inserts or replaces one raw value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes one key. Returns whether a value existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;
    /// Lists `(key, value)` pairs whose key starts with `prefix`, sorted by key.
    fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, String)>>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        (**self).delete(key)
    }

    fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, String)>> {
        (**self).scan_prefix(prefix)
    }
}

/// Reads and decodes one JSON record.
pub fn get_record<S, T>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    S: KvStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(raw) => decode_record(key, &raw).map(Some),
        None => Ok(None),
    }
}

/// Encodes and writes one JSON record.
pub fn put_record<S, T>(store: &S, key: &str, record: &T) -> StoreResult<()>
where
    S: KvStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(record).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// Decodes every record under `prefix`, in key order.
///
/// Records that fail to decode are skipped with a warning; only a failing
/// scan is an error.
pub fn scan_records<S, T>(store: &S, prefix: &str) -> StoreResult<Vec<T>>
where
    S: KvStore + ?Sized,
    T: DeserializeOwned,
{
    let records = store
        .scan_prefix(prefix)?
        .into_iter()
        .filter_map(|(key, raw)| match decode_record(&key, &raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=record_decode module=store status=skipped error_code=record_corrupt key={key} error={err}"
                );
                None
            }
        })
        .collect();
    Ok(records)
}

fn decode_record<T: DeserializeOwned>(key: &str, raw: &str) -> StoreResult<T> {
    serde_json::from_str(raw).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })
}
