//! Core domain logic for the booktracker library-lending model.
//! Authors own books; books and borrowers share a many-to-many relation.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::AppConfig;
pub use db::{open_db, open_db_in_memory, DbError, Session};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::{
    Author, AuthorId, Book, BookId, Borrower, BorrowerId, Genre, NewAuthor, NewBook, NewBorrower,
    ValidationError,
};
pub use repo::{
    AuthorRepository, BookRepository, BorrowerRepository, DuplicateKey, LookupKey, RepoError,
    RepoResult, SqliteAuthorRepository, SqliteBookRepository, SqliteBorrowerRepository,
};
pub use service::{
    AuthorService, BookService, BorrowerService, ErrorKind, LibraryServices, ServiceError,
    ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
