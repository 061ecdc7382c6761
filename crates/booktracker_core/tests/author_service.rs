use booktracker_core::db::open_db_in_memory;
use booktracker_core::{ErrorKind, Genre, LibraryServices, LookupKey, ServiceError, ValidationError};
use rusqlite::Connection;

fn author_rows(conn: &Connection, name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM authors WHERE name = ?1;",
        [name],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn add_then_get_by_name_returns_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let created = services
        .authors
        .add_author("George Orwell", "English novelist.")
        .unwrap();
    let loaded = services.authors.get_author_by_name("George Orwell").unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "George Orwell");
    assert_eq!(loaded.bio, "English novelist.");
    assert!(loaded.books().is_empty());
    assert_eq!(services.authors.get_author_by_id(created.id).unwrap(), created);
}

#[test]
fn duplicate_name_is_rejected_regardless_of_bio() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    services.authors.add_author("J.K. Rowling", "first").unwrap();
    let err = services
        .authors
        .add_author("J.K. Rowling", "a different bio")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
    assert_eq!(author_rows(&conn, "J.K. Rowling"), 1);
}

#[test]
fn blank_name_is_rejected_before_store_access() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let err = services.authors.add_author("   ", "bio").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidArgument(ValidationError::Blank("name"))
    ));
    assert_eq!(author_rows(&conn, "   "), 0);

    let err = services.authors.get_author_by_name("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn empty_bio_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let author = services.authors.add_author("Anonymous", "").unwrap();
    assert_eq!(author.bio, "");
}

#[test]
fn lookups_on_empty_store_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let err = services.authors.get_all_authors().unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(LookupKey::AnyAuthor)));

    let err = services.authors.get_author_by_id(524_565).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(LookupKey::AuthorId(524_565))));

    let err = services.authors.get_author_by_name("Nobody").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound(LookupKey::AuthorName(ref name)) if name == "Nobody"
    ));
}

#[test]
fn update_merges_full_state() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let mut author = services.authors.add_author("Tolkien", "old bio").unwrap();
    author.name = "J.R.R. Tolkien".to_string();
    author.bio = "British author of LOTR and The Hobbit.".to_string();
    services.authors.update_author(&author).unwrap();

    let loaded = services.authors.get_author_by_id(author.id).unwrap();
    assert_eq!(loaded.name, "J.R.R. Tolkien");
    assert_eq!(loaded.bio, "British author of LOTR and The Hobbit.");
    assert!(services.authors.get_author_by_name("Tolkien").is_err());
}

#[test]
fn update_to_taken_name_is_a_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    services.authors.add_author("Aldous Huxley", "").unwrap();
    let mut other = services.authors.add_author("Ray Bradbury", "").unwrap();
    other.name = "Aldous Huxley".to_string();

    let err = services.authors.update_author(&other).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
    assert_eq!(author_rows(&conn, "Aldous Huxley"), 1);
}

#[test]
fn update_of_deleted_author_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let author = services.authors.add_author("Ghost", "").unwrap();
    let stale = author.clone();
    services.authors.delete_author(author).unwrap();

    let err = services.authors.update_author(&stale).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(LookupKey::AuthorId(id)) if id == stale.id));
}

#[test]
fn deleting_one_author_keeps_siblings() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let first = services.authors.add_author("Author A", "").unwrap();
    let second = services.authors.add_author("Author B", "").unwrap();

    services.authors.delete_author(first).unwrap();

    assert!(services.authors.get_author_by_name("Author A").is_err());
    assert_eq!(
        services.authors.get_author_by_name("Author B").unwrap(),
        second
    );
    assert_eq!(services.authors.get_all_authors().unwrap().len(), 1);
}

#[test]
fn deleting_author_with_books_is_refused() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let mut orwell = services.authors.add_author("George Orwell", "").unwrap();
    services
        .books
        .add_book("1984", "9780451524935", &mut orwell, Genre::Dystopia)
        .unwrap();

    let err = services.authors.delete_author(orwell).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::StillReferenced { dependents: 1, .. }
    ));
    assert!(services.authors.get_author_by_name("George Orwell").is_ok());
}

#[test]
fn loaded_author_lists_owned_books() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let mut tolkien = services.authors.add_author("J.R.R. Tolkien", "").unwrap();
    let hobbit = services
        .books
        .add_book("The Hobbit", "9780547928227", &mut tolkien, Genre::Fantasy)
        .unwrap();
    let lotr = services
        .books
        .add_book(
            "The Lord of the Rings",
            "9780618640157",
            &mut tolkien,
            Genre::Fantasy,
        )
        .unwrap();

    assert_eq!(tolkien.books(), &[hobbit.id, lotr.id]);
    let loaded = services.authors.get_author_by_id(tolkien.id).unwrap();
    assert_eq!(loaded.books(), tolkien.books());
}

#[test]
fn delete_with_unsaved_name_of_sibling_removes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    services
        .authors
        .add_author("Ray Bradbury", "Fahrenheit 451")
        .unwrap();
    let mut huxley = services
        .authors
        .add_author("Aldous Huxley", "Brave New World")
        .unwrap();

    huxley.name = "Ray Bradbury".to_string();
    let err = services.authors.delete_author(huxley.clone()).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::NotFound(LookupKey::AuthorId(id)) if id == huxley.id
    ));
    assert_eq!(author_rows(&conn, "Ray Bradbury"), 1);
    assert_eq!(author_rows(&conn, "Aldous Huxley"), 1);
}
