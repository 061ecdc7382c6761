//! Store access for the library model.
//!
//! `open_db` / `open_db_in_memory` hand out connections with foreign keys
//! enforced and the schema at [`migrations::latest_version`]. Writes that
//! belong together go through [`Session::unit_of_work`] or, inside a
//! repository, [`with_savepoint`].

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod session;

pub use open::{open_db, open_db_in_memory};
pub use session::{with_savepoint, Session};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or talking to the store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The database was written by a build with a newer schema.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// `PRAGMA foreign_keys` did not switch on for the connection.
    ForeignKeysUnavailable,
    /// A schema step was rejected; earlier steps stay committed.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "library database is at schema version {db_version}, this build supports up to {latest_supported}"
            ),
            Self::ForeignKeysUnavailable => {
                write!(f, "sqlite connection refused to enable foreign keys")
            }
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "schema step {version} ({name}) failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::ForeignKeysUnavailable => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
