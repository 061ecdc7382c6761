//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define one data-access contract per entity type.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Inserts pre-check the natural key and also honor store `UNIQUE`
//!   constraints; both surface as `RepoError::Duplicate`.
//! - Missing rows and empty listings surface as `RepoError::NotFound`.
//! - Multi-statement writes run inside a savepoint.
//! - Deletes re-verify the natural key and only remove the row carrying the
//!   entity's own id; a key now held by another row is `NotFound`.

pub mod author_repo;
pub mod book_repo;
pub mod borrower_repo;
pub mod error;
mod sql;

pub use author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use book_repo::{BookRepository, SqliteBookRepository};
pub use borrower_repo::{BorrowerRepository, SqliteBorrowerRepository};
pub use error::{DuplicateKey, LookupKey, RepoError, RepoResult};
