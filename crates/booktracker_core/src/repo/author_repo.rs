//! Author repository contract and SQLite implementation.
//!
//! # Invariants
//! - `authors.name` is unique; duplicates are rejected before insert.
//! - Loaded authors carry their book ids ordered by id.
//! - An author that still owns books cannot be deleted.

use crate::model::{Author, AuthorId, NewAuthor};
use crate::repo::error::{DuplicateKey, LookupKey, RepoError, RepoResult};
use crate::repo::sql::{count_where, ensure_connection_ready, map_unique_violation, query_ids};
use rusqlite::{params, Connection, OptionalExtension, Row};

const AUTHOR_SELECT_SQL: &str = "SELECT id, name, bio FROM authors";
const AUTHOR_BOOKS_SQL: &str = "SELECT id FROM books WHERE author_id = ?1 ORDER BY id ASC;";

/// Repository interface for author persistence.
pub trait AuthorRepository {
    fn add_author(&self, author: &NewAuthor) -> RepoResult<Author>;
    fn get_all_authors(&self) -> RepoResult<Vec<Author>>;
    fn get_author_by_id(&self, id: AuthorId) -> RepoResult<Author>;
    fn get_author_by_name(&self, name: &str) -> RepoResult<Author>;
    fn update_author(&self, author: &Author) -> RepoResult<()>;
    fn delete_author(&self, author: &Author) -> RepoResult<()>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["authors", "books"])?;
        Ok(Self { conn })
    }

    fn find_one(&self, clause: &str, value: &dyn rusqlite::ToSql) -> RepoResult<Option<Author>> {
        let found = self
            .conn
            .query_row(
                &format!("{AUTHOR_SELECT_SQL} WHERE {clause};"),
                params![value],
                parse_author_row,
            )
            .optional()?;

        found.map(|parts| self.with_books(parts)).transpose()
    }

    fn with_books(&self, (id, name, bio): (AuthorId, String, String)) -> RepoResult<Author> {
        let books = query_ids(self.conn, AUTHOR_BOOKS_SQL, id)?;
        Ok(Author::from_parts(id, name, bio, books))
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn add_author(&self, author: &NewAuthor) -> RepoResult<Author> {
        let duplicate = || DuplicateKey {
            entity: "author",
            field: "name",
            value: author.name.clone(),
        };

        if count_where(self.conn, "authors", "name", &author.name)? > 0 {
            return Err(RepoError::Duplicate(duplicate()));
        }

        self.conn
            .execute(
                "INSERT INTO authors (name, bio) VALUES (?1, ?2);",
                params![author.name, author.bio],
            )
            .map_err(|err| map_unique_violation(err, duplicate()))?;

        Ok(Author::from_parts(
            self.conn.last_insert_rowid(),
            author.name.clone(),
            author.bio.clone(),
            Vec::new(),
        ))
    }

    fn get_all_authors(&self) -> RepoResult<Vec<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(self.with_books(parse_author_row(row)?)?);
        }

        if authors.is_empty() {
            return Err(RepoError::NotFound(LookupKey::AnyAuthor));
        }
        Ok(authors)
    }

    fn get_author_by_id(&self, id: AuthorId) -> RepoResult<Author> {
        self.find_one("id = ?1", &id)?
            .ok_or(RepoError::NotFound(LookupKey::AuthorId(id)))
    }

    fn get_author_by_name(&self, name: &str) -> RepoResult<Author> {
        self.find_one("name = ?1", &name)?
            .ok_or_else(|| RepoError::NotFound(LookupKey::AuthorName(name.to_string())))
    }

    fn update_author(&self, author: &Author) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE authors SET name = ?1, bio = ?2 WHERE id = ?3;",
                params![author.name, author.bio, author.id],
            )
            .map_err(|err| {
                map_unique_violation(
                    err,
                    DuplicateKey {
                        entity: "author",
                        field: "name",
                        value: author.name.clone(),
                    },
                )
            })?;

        if changed == 0 {
            return Err(RepoError::NotFound(LookupKey::AuthorId(author.id)));
        }
        Ok(())
    }

    fn delete_author(&self, author: &Author) -> RepoResult<()> {
        let stored = self.get_author_by_name(&author.name)?;
        if stored.id != author.id {
            return Err(RepoError::NotFound(LookupKey::AuthorId(author.id)));
        }

        let dependents = count_where(self.conn, "books", "author_id", &stored.id)?;
        if dependents > 0 {
            return Err(RepoError::StillReferenced {
                entity: "author",
                key: stored.name,
                dependents,
            });
        }

        self.conn
            .execute("DELETE FROM authors WHERE id = ?1;", [author.id])?;
        Ok(())
    }
}

fn parse_author_row(row: &Row<'_>) -> rusqlite::Result<(AuthorId, String, String)> {
    Ok((row.get("id")?, row.get("name")?, row.get("bio")?))
}
