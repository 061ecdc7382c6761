//! Borrower repository contract and SQLite implementation.
//!
//! # Invariants
//! - `borrowers.username` is unique; duplicates are rejected before insert.
//! - `add_borrower` and `update_borrower` write the borrower's relation rows
//!   in the same savepoint as the borrower row.
//! - Deleting a borrower removes its relation rows through `ON DELETE CASCADE`.

use crate::db::with_savepoint;
use crate::model::{Borrower, BorrowerId, NewBorrower};
use crate::repo::error::{DuplicateKey, LookupKey, RepoError, RepoResult};
use crate::repo::sql::{
    count_where, ensure_connection_ready, map_unique_violation, query_ids, replace_links,
    row_exists, LinkSide,
};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

const BORROWER_SELECT_SQL: &str = "SELECT
    br.id AS id,
    br.username AS username,
    br.first_name AS first_name,
    br.last_name AS last_name
FROM borrowers br";
const BORROWER_BOOKS_SQL: &str =
    "SELECT book_id FROM book_borrower WHERE borrower_id = ?1 ORDER BY book_id ASC;";

/// Repository interface for borrower persistence.
pub trait BorrowerRepository {
    fn add_borrower(&self, borrower: &NewBorrower) -> RepoResult<Borrower>;
    fn get_all_borrowers(&self) -> RepoResult<Vec<Borrower>>;
    fn get_borrower_by_id(&self, id: BorrowerId) -> RepoResult<Borrower>;
    fn get_borrower_by_username(&self, username: &str) -> RepoResult<Borrower>;
    fn get_borrowers_who_have_taken_book(&self, isbn: &str) -> RepoResult<Vec<Borrower>>;
    fn update_borrower(&self, borrower: &Borrower) -> RepoResult<()>;
    fn delete_borrower(&self, borrower: &Borrower) -> RepoResult<()>;
}

/// SQLite-backed borrower repository.
pub struct SqliteBorrowerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBorrowerRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["books", "borrowers", "book_borrower"])?;
        Ok(Self { conn })
    }

    fn find_many(&self, sql: &str, params: impl Params) -> RepoResult<Vec<Borrower>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut borrowers = Vec::new();
        while let Some(row) = rows.next()? {
            borrowers.push(self.with_books(parse_borrower_row(row)?)?);
        }
        Ok(borrowers)
    }

    fn find_one(&self, clause: &str, value: &dyn rusqlite::ToSql) -> RepoResult<Option<Borrower>> {
        let found = self
            .conn
            .query_row(
                &format!("{BORROWER_SELECT_SQL} WHERE {clause};"),
                params![value],
                parse_borrower_row,
            )
            .optional()?;

        found.map(|borrower| self.with_books(borrower)).transpose()
    }

    fn with_books(&self, borrower: Borrower) -> RepoResult<Borrower> {
        let books = query_ids(self.conn, BORROWER_BOOKS_SQL, borrower.id)?;
        Ok(Borrower::from_parts(
            borrower.id,
            borrower.username,
            borrower.first_name,
            borrower.last_name,
            books,
        ))
    }

    fn ensure_books_exist(&self, book_ids: &[i64]) -> RepoResult<()> {
        for book_id in book_ids {
            if !row_exists(self.conn, "books", *book_id)? {
                return Err(RepoError::NotFound(LookupKey::BookId(*book_id)));
            }
        }
        Ok(())
    }
}

impl BorrowerRepository for SqliteBorrowerRepository<'_> {
    fn add_borrower(&self, borrower: &NewBorrower) -> RepoResult<Borrower> {
        let duplicate = || DuplicateKey {
            entity: "borrower",
            field: "username",
            value: borrower.username.clone(),
        };

        if count_where(self.conn, "borrowers", "username", &borrower.username)? > 0 {
            return Err(RepoError::Duplicate(duplicate()));
        }

        with_savepoint(self.conn, "borrower_add", || {
            self.ensure_books_exist(&borrower.borrowed_books)?;
            self.conn
                .execute(
                    "INSERT INTO borrowers (username, first_name, last_name)
                     VALUES (?1, ?2, ?3);",
                    params![borrower.username, borrower.first_name, borrower.last_name],
                )
                .map_err(|err| map_unique_violation(err, duplicate()))?;

            let id = self.conn.last_insert_rowid();
            replace_links(self.conn, LinkSide::Borrower, id, &borrower.borrowed_books)?;
            self.with_books(Borrower::from_parts(
                id,
                borrower.username.clone(),
                borrower.first_name.clone(),
                borrower.last_name.clone(),
                Vec::new(),
            ))
        })
    }

    fn get_all_borrowers(&self) -> RepoResult<Vec<Borrower>> {
        let borrowers =
            self.find_many(&format!("{BORROWER_SELECT_SQL} ORDER BY br.id ASC;"), params![])?;
        if borrowers.is_empty() {
            return Err(RepoError::NotFound(LookupKey::AnyBorrower));
        }
        Ok(borrowers)
    }

    fn get_borrower_by_id(&self, id: BorrowerId) -> RepoResult<Borrower> {
        self.find_one("br.id = ?1", &id)?
            .ok_or(RepoError::NotFound(LookupKey::BorrowerId(id)))
    }

    fn get_borrower_by_username(&self, username: &str) -> RepoResult<Borrower> {
        self.find_one("br.username = ?1", &username)?.ok_or_else(|| {
            RepoError::NotFound(LookupKey::BorrowerUsername(username.to_string()))
        })
    }

    fn get_borrowers_who_have_taken_book(&self, isbn: &str) -> RepoResult<Vec<Borrower>> {
        let borrowers = self.find_many(
            &format!(
                "{BORROWER_SELECT_SQL}
                 INNER JOIN book_borrower bb ON bb.borrower_id = br.id
                 INNER JOIN books b ON b.id = bb.book_id
                 WHERE b.isbn = ?1
                 ORDER BY br.id ASC;"
            ),
            params![isbn],
        )?;

        if borrowers.is_empty() {
            return Err(RepoError::NotFound(LookupKey::BorrowersOfBook(
                isbn.to_string(),
            )));
        }
        Ok(borrowers)
    }

    fn update_borrower(&self, borrower: &Borrower) -> RepoResult<()> {
        with_savepoint(self.conn, "borrower_update", || {
            self.ensure_books_exist(borrower.borrowed_books())?;

            let changed = self
                .conn
                .execute(
                    "UPDATE borrowers
                     SET
                        username = ?1,
                        first_name = ?2,
                        last_name = ?3
                     WHERE id = ?4;",
                    params![
                        borrower.username,
                        borrower.first_name,
                        borrower.last_name,
                        borrower.id,
                    ],
                )
                .map_err(|err| {
                    map_unique_violation(
                        err,
                        DuplicateKey {
                            entity: "borrower",
                            field: "username",
                            value: borrower.username.clone(),
                        },
                    )
                })?;

            if changed == 0 {
                return Err(RepoError::NotFound(LookupKey::BorrowerId(borrower.id)));
            }

            replace_links(
                self.conn,
                LinkSide::Borrower,
                borrower.id,
                borrower.borrowed_books(),
            )
        })
    }

    fn delete_borrower(&self, borrower: &Borrower) -> RepoResult<()> {
        let stored = self.get_borrower_by_username(&borrower.username)?;
        if stored.id != borrower.id {
            return Err(RepoError::NotFound(LookupKey::BorrowerId(borrower.id)));
        }
        self.conn
            .execute("DELETE FROM borrowers WHERE id = ?1;", [borrower.id])?;
        Ok(())
    }
}

fn parse_borrower_row(row: &Row<'_>) -> rusqlite::Result<Borrower> {
    Ok(Borrower::from_parts(
        row.get("id")?,
        row.get("username")?,
        row.get("first_name")?,
        row.get("last_name")?,
        Vec::new(),
    ))
}
