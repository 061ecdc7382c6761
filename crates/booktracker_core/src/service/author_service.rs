//! Author use-case service.
//!
//! # Responsibility
//! - Validate author input before it reaches the repository.
//! - Pass reads and merges through to the repository unchanged.

use crate::model::validation::require_non_blank;
use crate::model::{Author, AuthorId, NewAuthor};
use crate::repo::AuthorRepository;
use crate::service::error::ServiceResult;
use log::info;

/// Author facade over repository implementations.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and stores an author.
    ///
    /// `bio` is required but may be empty.
    pub fn add_author(&self, name: &str, bio: &str) -> ServiceResult<Author> {
        require_non_blank("name", name)?;

        let author = self.repo.add_author(&NewAuthor {
            name: name.to_string(),
            bio: bio.to_string(),
        })?;
        info!(
            "event=author_add module=service status=ok author_id={}",
            author.id
        );
        Ok(author)
    }

    pub fn get_all_authors(&self) -> ServiceResult<Vec<Author>> {
        Ok(self.repo.get_all_authors()?)
    }

    pub fn get_author_by_id(&self, id: AuthorId) -> ServiceResult<Author> {
        Ok(self.repo.get_author_by_id(id)?)
    }

    pub fn get_author_by_name(&self, name: &str) -> ServiceResult<Author> {
        require_non_blank("name", name)?;
        Ok(self.repo.get_author_by_name(name)?)
    }

    /// Merges the full in-memory author state into the store.
    pub fn update_author(&self, author: &Author) -> ServiceResult<()> {
        require_non_blank("name", &author.name)?;
        self.repo.update_author(author)?;
        Ok(())
    }

    /// Deletes an author that no longer owns books.
    pub fn delete_author(&self, author: Author) -> ServiceResult<()> {
        self.repo.delete_author(&author)?;
        info!(
            "event=author_delete module=service status=ok author_id={}",
            author.id
        );
        Ok(())
    }
}
