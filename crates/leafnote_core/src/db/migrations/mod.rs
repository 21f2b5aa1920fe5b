//! Ordered schema scripts for the store database.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, Transaction};

/// `(version, script)` pairs, strictly increasing.
const SCRIPTS: [(u32, &str); 2] = [
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_kv_key_index.sql")),
];

/// Newest schema version this build can produce.
pub fn latest_version() -> u32 {
    SCRIPTS[SCRIPTS.len() - 1].0
}

/// Version recorded in the database file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings the database up to [`latest_version`] in one transaction.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<(u32, &str)> = SCRIPTS
        .iter()
        .copied()
        .filter(|(version, _)| *version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, script) in pending {
        run_script(&tx, version, script).map_err(|source| {
            error!("event=db_migrate module=db status=error version={version} error={source}");
            DbError::Migration { version, source }
        })?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={found} to={supported}");
    Ok(())
}

fn run_script(tx: &Transaction<'_>, version: u32, script: &str) -> rusqlite::Result<()> {
    tx.execute_batch(script)?;
    tx.pragma_update(None, "user_version", version)
}
