//! SQL helpers shared by the SQLite repositories.

use super::error::{DuplicateKey, RepoError, RepoResult};
use crate::db::migrations::{latest_version, schema_version};
use rusqlite::ffi::{SQLITE_CONSTRAINT_PRIMARYKEY, SQLITE_CONSTRAINT_UNIQUE};
use rusqlite::{params, Connection};

/// Verifies schema version and presence of `tables`.
pub(crate) fn ensure_connection_ready(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Counts rows of `table` whose `column` equals `value`.
///
/// `table` and `column` are compile-time identifiers, never caller input.
pub(crate) fn count_where(
    conn: &Connection,
    table: &'static str,
    column: &'static str,
    value: &dyn rusqlite::ToSql,
) -> RepoResult<i64> {
    let count = conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?1;"),
        params![value],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub(crate) fn row_exists(conn: &Connection, table: &'static str, id: i64) -> RepoResult<bool> {
    Ok(count_where(conn, table, "id", &id)? > 0)
}

/// Ids from a single-column query, in result order.
pub(crate) fn query_ids(conn: &Connection, sql: &str, key: i64) -> RepoResult<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([key])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }
    Ok(ids)
}

/// Maps store-level unique violations to `RepoError::Duplicate`.
pub(crate) fn map_unique_violation(err: rusqlite::Error, duplicate: DuplicateKey) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            RepoError::Duplicate(duplicate)
        }
        _ => err.into(),
    }
}

/// Which column of `book_borrower` a link replacement is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkSide {
    Book,
    Borrower,
}

/// Replaces every `book_borrower` row owned by `key` on `side`.
///
/// Each entry of `others` becomes one row pairing `key` with that id.
pub(crate) fn replace_links(
    conn: &Connection,
    side: LinkSide,
    key: i64,
    others: &[i64],
) -> RepoResult<()> {
    let (delete, insert) = match side {
        LinkSide::Book => (
            "DELETE FROM book_borrower WHERE book_id = ?1;",
            "INSERT OR IGNORE INTO book_borrower (book_id, borrower_id) VALUES (?1, ?2);",
        ),
        LinkSide::Borrower => (
            "DELETE FROM book_borrower WHERE borrower_id = ?1;",
            "INSERT OR IGNORE INTO book_borrower (borrower_id, book_id) VALUES (?1, ?2);",
        ),
    };

    conn.execute(delete, [key])?;
    let mut stmt = conn.prepare(insert)?;
    for other in others {
        stmt.execute(params![key, other])?;
    }
    Ok(())
}
