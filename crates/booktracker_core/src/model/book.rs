//! Book entity, owning side of the book↔borrower relation.
//!
//! # Invariants
//! - Every book belongs to exactly one author (`author_id`).
//! - `isbn` is unique and 13 digits long.
//! - `borrowers` holds each borrower id at most once.

use serde::{Deserialize, Serialize};

use super::author::{Author, AuthorId};
use super::borrower::{Borrower, BorrowerId};
use super::genre::Genre;
use super::{push_unique, remove_id};

pub type BookId = i64;

/// Input for creating a book under an existing author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub author_id: AuthorId,
    pub title: String,
    pub isbn: String,
    pub genre: Genre,
}

/// Persisted book with its borrower ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    author_id: AuthorId,
    pub title: String,
    pub isbn: String,
    pub genre: Genre,
    borrowers: Vec<BorrowerId>,
}

impl Book {
    pub(crate) fn from_parts(
        id: BookId,
        author_id: AuthorId,
        title: String,
        isbn: String,
        genre: Genre,
        borrowers: Vec<BorrowerId>,
    ) -> Self {
        Self {
            id,
            author_id,
            title,
            isbn,
            genre,
            borrowers,
        }
    }

    pub fn author_id(&self) -> AuthorId {
        self.author_id
    }

    /// Ids of borrowers currently holding this book.
    pub fn borrowers(&self) -> &[BorrowerId] {
        &self.borrowers
    }

    pub fn is_borrowed_by(&self, borrower_id: BorrowerId) -> bool {
        self.borrowers.contains(&borrower_id)
    }

    /// Points this book at `author` and registers it in the author's list.
    pub(crate) fn set_author(&mut self, author: &mut Author) {
        self.author_id = author.id;
        if !author.has_book(self.id) {
            author.add_book(self);
        }
    }

    /// Links `borrower` on both sides; relinking is a no-op.
    pub(crate) fn add_borrower(&mut self, borrower: &mut Borrower) {
        push_unique(&mut self.borrowers, borrower.id);
        push_unique(borrower.borrowed_books_mut(), self.id);
    }

    /// Unlinks `borrower`; the far side is touched only if this side held it.
    pub(crate) fn remove_borrower(&mut self, borrower: &mut Borrower) -> bool {
        if remove_id(&mut self.borrowers, borrower.id) {
            remove_id(borrower.borrowed_books_mut(), self.id);
            return true;
        }
        false
    }

    pub(crate) fn borrowers_mut(&mut self) -> &mut Vec<BorrowerId> {
        &mut self.borrowers
    }
}
