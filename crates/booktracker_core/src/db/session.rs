//! Unit-of-work handle over one long-lived SQLite connection.
//!
//! # Responsibility
//! - Own the process connection and hand it out per unit of work.
//! - Commit on success and roll back on failure of each unit.
//!
//! # Invariants
//! - A failed unit of work leaves no partial writes behind.
//! - The session stays usable after a rollback.

use super::{open_db, open_db_in_memory, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::fmt::Display;
use std::path::Path;
use std::time::Instant;

/// Explicit store context passed to repositories and services.
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Opens a file-backed session with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a fresh in-memory session with migrations applied.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already bootstrapped connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrows the connection for autocommit reads outside a unit of work.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Runs `work` inside one transaction.
    ///
    /// # Contract
    /// - `Ok` commits, `Err` rolls back and is returned unchanged.
    /// - Begin/commit failures surface through `E: From<rusqlite::Error>`.
    pub fn unit_of_work<T, E, F>(&mut self, name: &str, work: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<rusqlite::Error> + Display,
    {
        let started_at = Instant::now();
        let tx = self.conn.transaction()?;

        match work(&tx) {
            Ok(value) => {
                tx.commit()?;
                info!(
                    "event=unit_of_work module=db status=commit name={} duration_ms={}",
                    name,
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "event=unit_of_work module=db status=error name={} error_code=rollback_failed error={}",
                        name, rollback_err
                    );
                }
                warn!(
                    "event=unit_of_work module=db status=rollback name={} duration_ms={} error={}",
                    name,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Releases the underlying connection.
    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

/// Runs `work` inside a named savepoint on `conn`.
///
/// Works both inside an open transaction and in autocommit mode, so
/// multi-statement repository writes stay atomic either way.
pub fn with_savepoint<T, E, F>(conn: &Connection, name: &'static str, work: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<rusqlite::Error>,
{
    conn.execute_batch(&format!("SAVEPOINT {name};"))?;
    match work() {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE SAVEPOINT {name};"))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = conn.execute_batch(&format!(
                "ROLLBACK TO SAVEPOINT {name}; RELEASE SAVEPOINT {name};"
            )) {
                error!(
                    "event=savepoint module=db status=error name={} error_code=rollback_failed error={}",
                    name, rollback_err
                );
            }
            Err(err)
        }
    }
}
