//! Environment-driven settings for processes embedding the core.
//!
//! # Responsibility
//! - Resolve database location and logging settings from `BOOKTRACKER_*`
//!   variables.
//! - Open the configured store session.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - A missing database path selects a fresh in-memory database.

use crate::db::{DbResult, Session};
use crate::logging::{default_log_level, LogLevel, LoggingError};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "BOOKTRACKER_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "BOOKTRACKER_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "BOOKTRACKER_LOG_DIR";
const DEFAULT_LOG_DIR_NAME: &str = "booktracker-logs";

/// Resolved process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` means in-memory storage.
    pub db_path: Option<PathBuf>,
    pub log_level: LogLevel,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, used for tests and embedding.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(raw) => raw.parse()?,
            None => default_log_level(),
        };
        let log_dir = read(LOG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));

        Ok(Self {
            db_path: read(DB_PATH_ENV).map(PathBuf::from),
            log_level,
            log_dir,
        })
    }

    /// Opens a session on the configured store.
    pub fn open_session(&self) -> DbResult<Session> {
        match &self.db_path {
            Some(path) => Session::open(path),
            None => Session::open_in_memory(),
        }
    }
}
