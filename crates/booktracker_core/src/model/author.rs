//! Author entity.
//!
//! # Invariants
//! - `name` is unique across authors (enforced by the store).
//! - `books` mirrors every book whose `author_id` points here, as far as
//!   this in-memory copy has observed.

use serde::{Deserialize, Serialize};

use super::book::{Book, BookId};
use super::{push_unique, remove_id};

pub type AuthorId = i64;

/// Input for creating an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub bio: String,
}

/// Persisted author with its owned book ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub bio: String,
    books: Vec<BookId>,
}

impl Author {
    pub(crate) fn from_parts(id: AuthorId, name: String, bio: String, books: Vec<BookId>) -> Self {
        Self {
            id,
            name,
            bio,
            books,
        }
    }

    /// Ids of books written by this author.
    pub fn books(&self) -> &[BookId] {
        &self.books
    }

    pub fn has_book(&self, book_id: BookId) -> bool {
        self.books.contains(&book_id)
    }

    /// Adds `book` to this author and points the book back here.
    pub(crate) fn add_book(&mut self, book: &mut Book) {
        push_unique(&mut self.books, book.id);
        if book.author_id() != self.id {
            book.set_author(self);
        }
    }

    /// Drops `book_id` from the owned list. Returns whether it was present.
    pub(crate) fn remove_book(&mut self, book_id: BookId) -> bool {
        remove_id(&mut self.books, book_id)
    }
}
