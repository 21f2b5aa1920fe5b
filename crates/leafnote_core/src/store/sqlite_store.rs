//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Requires a connection returned by `db::open_db*` (table `kv_entries`).
//! - Every write stamps `updated_at` in epoch milliseconds.

use super::{KvStore, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value store over the `kv_entries` table.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }

    fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, String)>> {
        let prefix_len = i64::try_from(prefix.chars().count()).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            "SELECT key, value FROM kv_entries
             WHERE substr(key, 1, ?2) = ?1
             ORDER BY key ASC;",
        )?;
        let mut rows = stmt.query(params![prefix, prefix_len])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push((row.get(0)?, row.get(1)?));
        }
        Ok(entries)
    }
}
