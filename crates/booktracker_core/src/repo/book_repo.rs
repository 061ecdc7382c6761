//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist books and the owning side of the book↔borrower relation.
//! - Answer natural-key and by-author queries.
//!
//! # Invariants
//! - `books.isbn` is unique; duplicates are rejected before insert.
//! - `update_book` replaces the book's `book_borrower` rows with its
//!   in-memory borrower set.
//! - Deleting a book removes its relation rows through `ON DELETE CASCADE`.

use crate::db::with_savepoint;
use crate::model::{Book, BookId, Genre, NewBook};
use crate::repo::error::{DuplicateKey, LookupKey, RepoError, RepoResult};
use crate::repo::sql::{
    count_where, ensure_connection_ready, map_unique_violation, query_ids, replace_links,
    row_exists, LinkSide,
};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

const BOOK_SELECT_SQL: &str = "SELECT
    b.id AS id,
    b.author_id AS author_id,
    b.title AS title,
    b.isbn AS isbn,
    b.genre AS genre
FROM books b";
const BOOK_BORROWERS_SQL: &str =
    "SELECT borrower_id FROM book_borrower WHERE book_id = ?1 ORDER BY borrower_id ASC;";

/// Repository interface for book persistence.
pub trait BookRepository {
    fn add_book(&self, book: &NewBook) -> RepoResult<Book>;
    fn get_all_books(&self) -> RepoResult<Vec<Book>>;
    fn get_book_by_id(&self, id: BookId) -> RepoResult<Book>;
    fn get_book_by_isbn(&self, isbn: &str) -> RepoResult<Book>;
    fn get_all_books_by_author(&self, author_name: &str) -> RepoResult<Vec<Book>>;
    fn update_book(&self, book: &Book) -> RepoResult<()>;
    fn delete_book(&self, book: &Book) -> RepoResult<()>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

/// Scalar columns of one `books` row before relation loading.
struct BookRow {
    id: BookId,
    author_id: i64,
    title: String,
    isbn: String,
    genre: String,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["authors", "books", "borrowers", "book_borrower"])?;
        Ok(Self { conn })
    }

    fn find_one(&self, clause: &str, value: &dyn rusqlite::ToSql) -> RepoResult<Option<Book>> {
        let found = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE {clause};"),
                params![value],
                parse_book_row,
            )
            .optional()?;

        found.map(|row| self.hydrate(row)).transpose()
    }

    fn find_many(&self, sql: &str, params: impl Params) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(self.hydrate(parse_book_row(row)?)?);
        }
        Ok(books)
    }

    fn hydrate(&self, row: BookRow) -> RepoResult<Book> {
        let genre = Genre::parse(&row.genre).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid genre `{}` in books.genre", row.genre))
        })?;
        let borrowers = query_ids(self.conn, BOOK_BORROWERS_SQL, row.id)?;
        Ok(Book::from_parts(
            row.id,
            row.author_id,
            row.title,
            row.isbn,
            genre,
            borrowers,
        ))
    }

    fn ensure_references_exist(&self, book: &Book) -> RepoResult<()> {
        if !row_exists(self.conn, "authors", book.author_id())? {
            return Err(RepoError::NotFound(LookupKey::AuthorId(book.author_id())));
        }
        for borrower_id in book.borrowers() {
            if !row_exists(self.conn, "borrowers", *borrower_id)? {
                return Err(RepoError::NotFound(LookupKey::BorrowerId(*borrower_id)));
            }
        }
        Ok(())
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn add_book(&self, book: &NewBook) -> RepoResult<Book> {
        let duplicate = || DuplicateKey {
            entity: "book",
            field: "isbn",
            value: book.isbn.clone(),
        };

        if count_where(self.conn, "books", "isbn", &book.isbn)? > 0 {
            return Err(RepoError::Duplicate(duplicate()));
        }
        if !row_exists(self.conn, "authors", book.author_id)? {
            return Err(RepoError::NotFound(LookupKey::AuthorId(book.author_id)));
        }

        self.conn
            .execute(
                "INSERT INTO books (author_id, title, isbn, genre) VALUES (?1, ?2, ?3, ?4);",
                params![book.author_id, book.title, book.isbn, book.genre.as_str()],
            )
            .map_err(|err| map_unique_violation(err, duplicate()))?;

        Ok(Book::from_parts(
            self.conn.last_insert_rowid(),
            book.author_id,
            book.title.clone(),
            book.isbn.clone(),
            book.genre,
            Vec::new(),
        ))
    }

    fn get_all_books(&self) -> RepoResult<Vec<Book>> {
        let books = self.find_many(&format!("{BOOK_SELECT_SQL} ORDER BY b.id ASC;"), params![])?;
        if books.is_empty() {
            return Err(RepoError::NotFound(LookupKey::AnyBook));
        }
        Ok(books)
    }

    fn get_book_by_id(&self, id: BookId) -> RepoResult<Book> {
        self.find_one("b.id = ?1", &id)?
            .ok_or(RepoError::NotFound(LookupKey::BookId(id)))
    }

    fn get_book_by_isbn(&self, isbn: &str) -> RepoResult<Book> {
        self.find_one("b.isbn = ?1", &isbn)?
            .ok_or_else(|| RepoError::NotFound(LookupKey::BookIsbn(isbn.to_string())))
    }

    fn get_all_books_by_author(&self, author_name: &str) -> RepoResult<Vec<Book>> {
        let books = self.find_many(
            &format!(
                "{BOOK_SELECT_SQL}
                 INNER JOIN authors a ON a.id = b.author_id
                 WHERE a.name = ?1
                 ORDER BY b.id ASC;"
            ),
            params![author_name],
        )?;

        if books.is_empty() {
            return Err(RepoError::NotFound(LookupKey::BooksByAuthor(
                author_name.to_string(),
            )));
        }
        Ok(books)
    }

    fn update_book(&self, book: &Book) -> RepoResult<()> {
        with_savepoint(self.conn, "book_update", || {
            self.ensure_references_exist(book)?;

            let changed = self
                .conn
                .execute(
                    "UPDATE books
                     SET
                        author_id = ?1,
                        title = ?2,
                        isbn = ?3,
                        genre = ?4
                     WHERE id = ?5;",
                    params![
                        book.author_id(),
                        book.title,
                        book.isbn,
                        book.genre.as_str(),
                        book.id,
                    ],
                )
                .map_err(|err| {
                    map_unique_violation(
                        err,
                        DuplicateKey {
                            entity: "book",
                            field: "isbn",
                            value: book.isbn.clone(),
                        },
                    )
                })?;

            if changed == 0 {
                return Err(RepoError::NotFound(LookupKey::BookId(book.id)));
            }

            replace_links(self.conn, LinkSide::Book, book.id, book.borrowers())
        })
    }

    fn delete_book(&self, book: &Book) -> RepoResult<()> {
        let stored = self.get_book_by_isbn(&book.isbn)?;
        if stored.id != book.id {
            return Err(RepoError::NotFound(LookupKey::BookId(book.id)));
        }
        self.conn
            .execute("DELETE FROM books WHERE id = ?1;", [book.id])?;
        Ok(())
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<BookRow> {
    Ok(BookRow {
        id: row.get("id")?,
        author_id: row.get("author_id")?,
        title: row.get("title")?,
        isbn: row.get("isbn")?,
        genre: row.get("genre")?,
    })
}
