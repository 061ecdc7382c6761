//! Borrower entity, inverse side of the book↔borrower relation.
//!
//! # Invariants
//! - `username` is unique across borrowers.
//! - `borrowed_books` mirrors `Book::borrowers` for the same relation rows.

use serde::{Deserialize, Serialize};

use super::book::{Book, BookId};
use super::{push_unique, remove_id};

pub type BorrowerId = i64;

/// Input for registering a borrower, optionally with books already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBorrower {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub borrowed_books: Vec<BookId>,
}

/// Persisted borrower with borrowed book ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    pub id: BorrowerId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    borrowed_books: Vec<BookId>,
}

impl Borrower {
    pub(crate) fn from_parts(
        id: BorrowerId,
        username: String,
        first_name: String,
        last_name: String,
        borrowed_books: Vec<BookId>,
    ) -> Self {
        Self {
            id,
            username,
            first_name,
            last_name,
            borrowed_books,
        }
    }

    /// Ids of books this borrower currently holds.
    pub fn borrowed_books(&self) -> &[BookId] {
        &self.borrowed_books
    }

    pub fn has_borrowed(&self, book_id: BookId) -> bool {
        self.borrowed_books.contains(&book_id)
    }

    /// Links `book` on both sides; borrowing twice is a no-op.
    pub(crate) fn borrow_book(&mut self, book: &mut Book) {
        push_unique(&mut self.borrowed_books, book.id);
        push_unique(book.borrowers_mut(), self.id);
    }

    /// Unlinks `book`; the far side is touched only if this side held it.
    pub(crate) fn return_book(&mut self, book: &mut Book) -> bool {
        if remove_id(&mut self.borrowed_books, book.id) {
            remove_id(book.borrowers_mut(), self.id);
            return true;
        }
        false
    }

    pub(crate) fn borrowed_books_mut(&mut self) -> &mut Vec<BookId> {
        &mut self.borrowed_books
    }
}
