//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input and delegate to repositories 1:1.
//! - Keep callers decoupled from storage details.

pub mod author_service;
pub mod book_service;
pub mod borrower_service;
pub mod error;

pub use author_service::AuthorService;
pub use book_service::BookService;
pub use borrower_service::BorrowerService;
pub use error::{ErrorKind, ServiceError, ServiceResult};

use crate::repo::{
    RepoResult, SqliteAuthorRepository, SqliteBookRepository, SqliteBorrowerRepository,
};
use rusqlite::Connection;

/// The three SQLite-backed services bound to one connection.
///
/// Built per unit of work from the connection that [`crate::db::Session`]
/// hands out.
pub struct LibraryServices<'conn> {
    pub authors: AuthorService<SqliteAuthorRepository<'conn>>,
    pub books: BookService<SqliteBookRepository<'conn>>,
    pub borrowers: BorrowerService<SqliteBorrowerRepository<'conn>>,
}

impl<'conn> LibraryServices<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            authors: AuthorService::new(SqliteAuthorRepository::try_new(conn)?),
            books: BookService::new(SqliteBookRepository::try_new(conn)?),
            borrowers: BorrowerService::new(SqliteBorrowerRepository::try_new(conn)?),
        })
    }
}
