//! Ordered schema steps for the library store.
//!
//! Step 1 holds the catalog (`authors`, `books`), step 2 the lending side
//! (`borrowers`, `book_borrower`). Each step commits on its own and bumps
//! `PRAGMA user_version` to its number, so an interrupted upgrade resumes
//! from the last committed step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "catalog",
        sql: include_str!("0001_catalog.sql"),
    },
    Migration {
        version: 2,
        name: "lending",
        sql: include_str!("0002_lending.sql"),
    },
];

/// Schema version a fully migrated database reports.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads `PRAGMA user_version` from `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`].
///
/// Fails with `UnsupportedSchemaVersion` for databases written by a newer
/// build and with `Migration` when a step's SQL is rejected.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > from_version) {
        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
        tx.commit()?;

        info!(
            "event=db_migrate module=db status=ok from_version={} version={} name={}",
            from_version, migration.version, migration.name
        );
    }
    Ok(())
}
