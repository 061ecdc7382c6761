//! Book use-case service.
//!
//! # Responsibility
//! - Validate book input and wire author/borrower relations in memory.
//! - Persist the owning side of book↔borrower changes through merges.
//!
//! # Invariants
//! - In-memory relation collections are updated before the merge is issued.
//! - A book is always detached from its author's list when deleted.

use crate::model::validation::{require_non_blank, validate_isbn};
use crate::model::{Author, Book, BookId, Borrower, Genre, LinkSnapshot, NewBook, ValidationError};
use crate::repo::BookRepository;
use crate::service::error::ServiceResult;
use log::info;

/// Book facade over repository implementations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a book under `author` and registers it in the author's list.
    ///
    /// # Contract
    /// - `title` non-blank, `isbn` exactly 13 digits.
    /// - `author` must already be stored.
    /// - Does not persist `author`; its book list is in-memory bookkeeping.
    pub fn add_book(
        &self,
        title: &str,
        isbn: &str,
        author: &mut Author,
        genre: Genre,
    ) -> ServiceResult<Book> {
        require_non_blank("title", title)?;
        validate_isbn(isbn)?;

        let mut book = self.repo.add_book(&NewBook {
            author_id: author.id,
            title: title.to_string(),
            isbn: isbn.to_string(),
            genre,
        })?;
        author.add_book(&mut book);

        info!(
            "event=book_add module=service status=ok book_id={} author_id={}",
            book.id, author.id
        );
        Ok(book)
    }

    pub fn get_book_by_id(&self, id: BookId) -> ServiceResult<Book> {
        Ok(self.repo.get_book_by_id(id)?)
    }

    pub fn get_book_by_isbn(&self, isbn: &str) -> ServiceResult<Book> {
        require_non_blank("isbn", isbn)?;
        Ok(self.repo.get_book_by_isbn(isbn)?)
    }

    pub fn get_all_books(&self) -> ServiceResult<Vec<Book>> {
        Ok(self.repo.get_all_books()?)
    }

    pub fn get_all_books_by_author(&self, author_name: &str) -> ServiceResult<Vec<Book>> {
        require_non_blank("author name", author_name)?;
        Ok(self.repo.get_all_books_by_author(author_name)?)
    }

    /// Merges the full in-memory book state, borrowers included.
    pub fn update_book(&self, book: &Book) -> ServiceResult<()> {
        require_non_blank("title", &book.title)?;
        validate_isbn(&book.isbn)?;
        self.repo.update_book(book)?;
        Ok(())
    }

    /// Detaches `book` from `author`, then removes it from the store.
    ///
    /// On store failure the book is put back into the author's list.
    pub fn delete_book(&self, author: &mut Author, mut book: Book) -> ServiceResult<()> {
        if book.author_id() != author.id {
            return Err(ValidationError::AuthorMismatch {
                book_id: book.id,
                author_id: author.id,
            }
            .into());
        }

        let was_listed = author.remove_book(book.id);
        if let Err(err) = self.repo.delete_book(&book) {
            if was_listed {
                author.add_book(&mut book);
            }
            return Err(err.into());
        }

        info!(
            "event=book_delete module=service status=ok book_id={} author_id={}",
            book.id, author.id
        );
        Ok(())
    }

    /// Moves `book` from its current author `from` to `to`.
    ///
    /// On store failure `book`, `from` and `to` are left as they were.
    pub fn reassign_author(
        &self,
        book: &mut Book,
        from: &mut Author,
        to: &mut Author,
    ) -> ServiceResult<()> {
        if book.author_id() != from.id {
            return Err(ValidationError::AuthorMismatch {
                book_id: book.id,
                author_id: from.id,
            }
            .into());
        }

        let before = (book.clone(), from.clone(), to.clone());
        from.remove_book(book.id);
        book.set_author(to);

        if let Err(err) = self.repo.update_book(book) {
            (*book, *from, *to) = before;
            return Err(err.into());
        }
        Ok(())
    }

    /// Links `borrower` to `book` on both sides and merges the book.
    ///
    /// Linking an already-linked pair leaves both collections unchanged.
    /// On store failure both collections are restored.
    pub fn add_borrower(&self, book: &mut Book, borrower: &mut Borrower) -> ServiceResult<()> {
        let link = LinkSnapshot::take(book, borrower);
        book.add_borrower(borrower);

        if let Err(err) = self.repo.update_book(book) {
            link.restore(book, borrower);
            return Err(err.into());
        }
        Ok(())
    }

    /// Unlinks `borrower` from `book` on both sides and merges the book.
    ///
    /// Returns `false` without touching the store when the pair was not linked.
    /// On store failure the link is put back.
    pub fn remove_borrower(&self, book: &mut Book, borrower: &mut Borrower) -> ServiceResult<bool> {
        let link = LinkSnapshot::take(book, borrower);
        if !book.remove_borrower(borrower) {
            return Ok(false);
        }

        if let Err(err) = self.repo.update_book(book) {
            link.restore(book, borrower);
            return Err(err.into());
        }
        Ok(true)
    }
}
