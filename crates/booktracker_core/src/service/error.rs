//! Service error shared by the author/book/borrower facades.

use crate::db::DbError;
use crate::model::ValidationError;
use crate::repo::{DuplicateKey, LookupKey, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    DuplicateEntry,
    InvalidArgument,
    StillReferenced,
    Storage,
}

/// Service error for library use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected before any store access.
    InvalidArgument(ValidationError),
    /// Requested key absent or listing empty.
    NotFound(LookupKey),
    /// Natural key already taken.
    DuplicateEntry(DuplicateKey),
    /// Delete refused because dependents remain.
    StillReferenced {
        entity: &'static str,
        key: String,
        dependents: i64,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DuplicateEntry(_) => ErrorKind::DuplicateEntry,
            Self::StillReferenced { .. } => ErrorKind::StillReferenced,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(err) => write!(f, "invalid argument: {err}"),
            Self::NotFound(key) => write!(f, "{key}"),
            Self::DuplicateEntry(key) => write!(f, "{key}"),
            Self::StillReferenced {
                entity,
                key,
                dependents,
            } => write!(
                f,
                "{entity} {key} is still referenced by {dependents} row(s)"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArgument(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidArgument(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(key) => Self::NotFound(key),
            RepoError::Duplicate(key) => Self::DuplicateEntry(key),
            RepoError::StillReferenced {
                entity,
                key,
                dependents,
            } => Self::StillReferenced {
                entity,
                key,
                dependents,
            },
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}
