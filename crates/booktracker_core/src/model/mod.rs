//! Entity model for the library domain.
//!
//! # Responsibility
//! - Define the Author/Book/Borrower records and the Genre enumeration.
//! - Keep bidirectional relation collections mirrored in memory.
//!
//! # Invariants
//! - Entity ids are store-generated; drafts (`New*`) carry no id.
//! - Relation collections hold ids only, in insertion order, without
//!   duplicates.
//! - Relation collections are mutated only through crate-internal helpers
//!   reached from the service layer.

pub mod author;
pub mod book;
pub mod borrower;
pub mod genre;
pub mod validation;

pub use author::{Author, AuthorId, NewAuthor};
pub use book::{Book, BookId, NewBook};
pub use borrower::{Borrower, BorrowerId, NewBorrower};
pub use genre::Genre;
pub use validation::ValidationError;

/// Both sides of one book↔borrower pair as they were before a change.
///
/// Lets a service put the in-memory collections back, order included,
/// when the store rejects the matching write.
pub(crate) struct LinkSnapshot {
    book_borrowers: Vec<BorrowerId>,
    borrowed_books: Vec<BookId>,
}

impl LinkSnapshot {
    pub(crate) fn take(book: &Book, borrower: &Borrower) -> Self {
        Self {
            book_borrowers: book.borrowers().to_vec(),
            borrowed_books: borrower.borrowed_books().to_vec(),
        }
    }

    pub(crate) fn restore(self, book: &mut Book, borrower: &mut Borrower) {
        *book.borrowers_mut() = self.book_borrowers;
        *borrower.borrowed_books_mut() = self.borrowed_books;
    }
}

/// Appends `id` unless already present. Returns whether it was appended.
pub(crate) fn push_unique(ids: &mut Vec<i64>, id: i64) -> bool {
    if ids.contains(&id) {
        return false;
    }
    ids.push(id);
    true
}

/// Removes `id` when present. Returns whether an element was removed.
pub(crate) fn remove_id(ids: &mut Vec<i64>, id: i64) -> bool {
    match ids.iter().position(|current| *current == id) {
        Some(index) => {
            ids.remove(index);
            true
        }
        None => false,
    }
}
