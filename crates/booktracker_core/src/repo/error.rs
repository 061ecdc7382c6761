//! Repository error and lookup-key types shared by all repositories.

use crate::db::DbError;
use crate::model::{AuthorId, BookId, BorrowerId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// What a failed lookup was searching for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    AuthorId(AuthorId),
    AuthorName(String),
    AnyAuthor,
    BookId(BookId),
    BookIsbn(String),
    AnyBook,
    BooksByAuthor(String),
    BorrowerId(BorrowerId),
    BorrowerUsername(String),
    AnyBorrower,
    BorrowersOfBook(String),
}

impl Display for LookupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthorId(id) => write!(f, "author with id {id} not found"),
            Self::AuthorName(name) => write!(f, "author with name {name} not found"),
            Self::AnyAuthor => write!(f, "no authors found"),
            Self::BookId(id) => write!(f, "book with id {id} not found"),
            Self::BookIsbn(isbn) => write!(f, "book with isbn {isbn} not found"),
            Self::AnyBook => write!(f, "no books found"),
            Self::BooksByAuthor(name) => {
                write!(f, "no books found for author with name {name}")
            }
            Self::BorrowerId(id) => write!(f, "borrower with id {id} not found"),
            Self::BorrowerUsername(username) => {
                write!(f, "borrower with username {username} not found")
            }
            Self::AnyBorrower => write!(f, "no borrowers found"),
            Self::BorrowersOfBook(isbn) => {
                write!(f, "no borrowers found for book with isbn {isbn}")
            }
        }
    }
}

/// Natural-key collision reported on insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub entity: &'static str,
    pub field: &'static str,
    pub value: String,
}

impl Display for DuplicateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} with {} {} already exists",
            self.entity, self.field, self.value
        )
    }
}

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(LookupKey),
    Duplicate(DuplicateKey),
    /// Delete refused because other rows still reference the target.
    StillReferenced {
        entity: &'static str,
        key: String,
        dependents: i64,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "{key}"),
            Self::Duplicate(key) => write!(f, "{key}"),
            Self::StillReferenced {
                entity,
                key,
                dependents,
            } => write!(
                f,
                "{entity} {key} is still referenced by {dependents} row(s)"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
