//! Borrower use-case service.
//!
//! # Responsibility
//! - Validate borrower input before it reaches the repository.
//! - Keep borrowed-book collections mirrored with `Book::borrowers`.

use crate::model::validation::require_non_blank;
use crate::model::{Book, Borrower, BorrowerId, LinkSnapshot, NewBorrower};
use crate::repo::BorrowerRepository;
use crate::service::error::ServiceResult;
use log::info;

/// Borrower facade over repository implementations.
pub struct BorrowerService<R: BorrowerRepository> {
    repo: R,
}

impl<R: BorrowerRepository> BorrowerService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a borrower, optionally already holding `books`.
    ///
    /// Each book in `books` gains the new borrower in its in-memory list.
    pub fn add_borrower(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        books: &mut [&mut Book],
    ) -> ServiceResult<Borrower> {
        require_non_blank("username", username)?;
        require_non_blank("first name", first_name)?;
        require_non_blank("last name", last_name)?;

        let mut borrowed_books = Vec::with_capacity(books.len());
        for book in books.iter() {
            if !borrowed_books.contains(&book.id) {
                borrowed_books.push(book.id);
            }
        }

        let mut borrower = self.repo.add_borrower(&NewBorrower {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            borrowed_books,
        })?;
        for book in books.iter_mut() {
            borrower.borrow_book(book);
        }

        info!(
            "event=borrower_add module=service status=ok borrower_id={} books={}",
            borrower.id,
            borrower.borrowed_books().len()
        );
        Ok(borrower)
    }

    pub fn get_borrower_by_id(&self, id: BorrowerId) -> ServiceResult<Borrower> {
        Ok(self.repo.get_borrower_by_id(id)?)
    }

    pub fn get_borrower_by_username(&self, username: &str) -> ServiceResult<Borrower> {
        require_non_blank("username", username)?;
        Ok(self.repo.get_borrower_by_username(username)?)
    }

    pub fn get_all_borrowers(&self) -> ServiceResult<Vec<Borrower>> {
        Ok(self.repo.get_all_borrowers()?)
    }

    pub fn get_borrowers_who_have_taken_book(&self, isbn: &str) -> ServiceResult<Vec<Borrower>> {
        require_non_blank("isbn", isbn)?;
        Ok(self.repo.get_borrowers_who_have_taken_book(isbn)?)
    }

    /// Merges the full in-memory borrower state, borrowed books included.
    pub fn update_borrower(&self, borrower: &Borrower) -> ServiceResult<()> {
        require_non_blank("username", &borrower.username)?;
        require_non_blank("first name", &borrower.first_name)?;
        require_non_blank("last name", &borrower.last_name)?;
        self.repo.update_borrower(borrower)?;
        Ok(())
    }

    pub fn delete_borrower(&self, borrower: Borrower) -> ServiceResult<()> {
        self.repo.delete_borrower(&borrower)?;
        info!(
            "event=borrower_delete module=service status=ok borrower_id={}",
            borrower.id
        );
        Ok(())
    }

    /// Links `book` to `borrower` on both sides and merges the borrower.
    ///
    /// On store failure both collections are restored.
    pub fn borrow_book(&self, borrower: &mut Borrower, book: &mut Book) -> ServiceResult<()> {
        let link = LinkSnapshot::take(book, borrower);
        borrower.borrow_book(book);

        if let Err(err) = self.repo.update_borrower(borrower) {
            link.restore(book, borrower);
            return Err(err.into());
        }
        Ok(())
    }

    /// Unlinks `book` from `borrower` on both sides and merges the borrower.
    ///
    /// Returns `false` without touching the store when the pair was not linked.
    pub fn return_book(&self, borrower: &mut Borrower, book: &mut Book) -> ServiceResult<bool> {
        let link = LinkSnapshot::take(book, borrower);
        if !borrower.return_book(book) {
            return Ok(false);
        }

        if let Err(err) = self.repo.update_borrower(borrower) {
            link.restore(book, borrower);
            return Err(err.into());
        }
        Ok(true)
    }
}
