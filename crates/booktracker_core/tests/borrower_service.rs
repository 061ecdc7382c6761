use booktracker_core::db::open_db_in_memory;
use booktracker_core::{
    Book, ErrorKind, Genre, LibraryServices, LookupKey, ServiceError, ValidationError,
};
use rusqlite::Connection;

fn books(services: &LibraryServices<'_>) -> (Book, Book) {
    let mut tolkien = services.authors.add_author("J.R.R. Tolkien", "").unwrap();
    let mut orwell = services.authors.add_author("George Orwell", "").unwrap();
    let hobbit = services
        .books
        .add_book("The Hobbit", "9780547928227", &mut tolkien, Genre::Fantasy)
        .unwrap();
    let nineteen = services
        .books
        .add_book("1984", "9780451524935", &mut orwell, Genre::Dystopia)
        .unwrap();
    (hobbit, nineteen)
}

fn link_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM book_borrower;", [], |row| row.get(0))
        .unwrap()
}

fn borrower_rows(conn: &Connection, username: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM borrowers WHERE username = ?1;",
        [username],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn add_then_get_by_username_returns_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let created = services
        .borrowers
        .add_borrower("alice", "Alice", "Johnson", &mut [])
        .unwrap();
    let loaded = services
        .borrowers
        .get_borrower_by_username("alice")
        .unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.first_name, "Alice");
    assert_eq!(loaded.last_name, "Johnson");
    assert!(loaded.borrowed_books().is_empty());
    assert_eq!(
        services.borrowers.get_borrower_by_id(created.id).unwrap(),
        created
    );
}

#[test]
fn duplicate_username_keeps_a_single_row() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    services
        .borrowers
        .add_borrower("alice", "Alice", "Johnson", &mut [])
        .unwrap();
    let err = services
        .borrowers
        .add_borrower("alice", "Alicia", "Keys", &mut [])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
    assert_eq!(borrower_rows(&conn, "alice"), 1);
}

#[test]
fn blank_fields_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let err = services
        .borrowers
        .add_borrower("", "Bob", "Smith", &mut [])
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidArgument(ValidationError::Blank("username"))
    ));

    let err = services
        .borrowers
        .add_borrower("bob", " ", "Smith", &mut [])
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidArgument(ValidationError::Blank("first name"))
    ));

    let err = services
        .borrowers
        .add_borrower("bob", "Bob", "", &mut [])
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidArgument(ValidationError::Blank("last name"))
    ));
    assert_eq!(borrower_rows(&conn, "bob"), 0);
}

#[test]
fn add_with_books_links_both_sides() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    let (mut hobbit, mut nineteen) = books(&services);

    let alice = services
        .borrowers
        .add_borrower("alice", "Alice", "Johnson", &mut [&mut hobbit, &mut nineteen])
        .unwrap();

    assert_eq!(alice.borrowed_books(), &[hobbit.id, nineteen.id]);
    assert_eq!(hobbit.borrowers(), &[alice.id]);
    assert_eq!(nineteen.borrowers(), &[alice.id]);

    let takers = services
        .borrowers
        .get_borrowers_who_have_taken_book("9780547928227")
        .unwrap();
    assert_eq!(takers, vec![alice.clone()]);
    assert_eq!(
        services.books.get_book_by_id(hobbit.id).unwrap().borrowers(),
        &[alice.id]
    );
}

#[test]
fn linking_same_pair_twice_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    let (_, mut nineteen) = books(&services);
    let mut alice = services
        .borrowers
        .add_borrower("alice", "Alice", "Johnson", &mut [])
        .unwrap();

    services.books.add_borrower(&mut nineteen, &mut alice).unwrap();
    services.books.add_borrower(&mut nineteen, &mut alice).unwrap();

    assert_eq!(nineteen.borrowers(), &[alice.id]);
    assert_eq!(alice.borrowed_books(), &[nineteen.id]);
    assert_eq!(link_rows(&conn), 1);

    let stored_alice = services
        .borrowers
        .get_borrower_by_username("alice")
        .unwrap();
    assert_eq!(stored_alice.borrowed_books(), &[nineteen.id]);
}

#[test]
fn unlinking_linked_pair_clears_both_sides() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    let (_, mut nineteen) = books(&services);
    let mut alice = services
        .borrowers
        .add_borrower("alice", "Alice", "Johnson", &mut [])
        .unwrap();
    let mut bob = services
        .borrowers
        .add_borrower("bob", "Bob", "Smith", &mut [])
        .unwrap();
    services.books.add_borrower(&mut nineteen, &mut alice).unwrap();
    services.books.add_borrower(&mut nineteen, &mut bob).unwrap();

    assert!(services
        .books
        .remove_borrower(&mut nineteen, &mut bob)
        .unwrap());

    assert_eq!(nineteen.borrowers(), &[alice.id]);
    assert!(bob.borrowed_books().is_empty());
    let takers = services
        .borrowers
        .get_borrowers_who_have_taken_book("9780451524935")
        .unwrap();
    assert_eq!(takers.len(), 1);
    assert_eq!(takers[0].username, "alice");
}

#[test]
fn unlinking_never_linked_pair_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    let (mut hobbit, mut nineteen) = books(&services);
    let mut alice = services
        .borrowers
        .add_borrower("alice", "Alice", "Johnson", &mut [&mut nineteen])
        .unwrap();

    assert!(!services
        .books
        .remove_borrower(&mut hobbit, &mut alice)
        .unwrap());
    assert!(!services
        .borrowers
        .return_book(&mut alice, &mut hobbit)
        .unwrap());

    assert!(hobbit.borrowers().is_empty());
    assert_eq!(alice.borrowed_books(), &[nineteen.id]);
    assert_eq!(link_rows(&conn), 1);
}

#[test]
fn borrow_and_return_persist_through_borrower_side() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    let (mut hobbit, _) = books(&services);
    let mut bob = services
        .borrowers
        .add_borrower("bob", "Bob", "Smith", &mut [])
        .unwrap();

    services.borrowers.borrow_book(&mut bob, &mut hobbit).unwrap();
    assert_eq!(hobbit.borrowers(), &[bob.id]);
    assert_eq!(
        services.books.get_book_by_id(hobbit.id).unwrap().borrowers(),
        &[bob.id]
    );

    assert!(services
        .borrowers
        .return_book(&mut bob, &mut hobbit)
        .unwrap());
    assert!(hobbit.borrowers().is_empty());
    assert!(services
        .books
        .get_book_by_id(hobbit.id)
        .unwrap()
        .borrowers()
        .is_empty());
}

#[test]
fn takers_of_unborrowed_book_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    books(&services);
    services
        .borrowers
        .add_borrower("alice", "Alice", "Johnson", &mut [])
        .unwrap();

    let err = services
        .borrowers
        .get_borrowers_who_have_taken_book("9780547928227")
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound(LookupKey::BorrowersOfBook(_))
    ));
}

#[test]
fn update_merges_names() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    let mut bob = services
        .borrowers
        .add_borrower("bob", "Bob", "Smith", &mut [])
        .unwrap();

    bob.last_name = "Smithers".to_string();
    services.borrowers.update_borrower(&bob).unwrap();

    assert_eq!(
        services
            .borrowers
            .get_borrower_by_id(bob.id)
            .unwrap()
            .last_name,
        "Smithers"
    );
}

#[test]
fn delete_borrower_drops_links_and_keeps_siblings() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    let (mut hobbit, _) = books(&services);
    let alice = services
        .borrowers
        .add_borrower("alice", "Alice", "Johnson", &mut [&mut hobbit])
        .unwrap();
    let bob = services
        .borrowers
        .add_borrower("bob", "Bob", "Smith", &mut [&mut hobbit])
        .unwrap();

    services.borrowers.delete_borrower(alice).unwrap();

    let err = services
        .borrowers
        .get_borrower_by_username("alice")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        services.borrowers.get_borrower_by_username("bob").unwrap(),
        bob
    );
    assert_eq!(
        services.books.get_book_by_id(hobbit.id).unwrap().borrowers(),
        &[bob.id]
    );
}

#[test]
fn empty_store_has_no_borrowers() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();

    let err = services.borrowers.get_all_borrowers().unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(LookupKey::AnyBorrower)));
}

#[test]
fn delete_with_unsaved_username_of_sibling_removes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    services
        .borrowers
        .add_borrower("alice", "Alice", "Johnson", &mut [])
        .unwrap();
    let mut bob = services
        .borrowers
        .add_borrower("bob", "Bob", "Smith", &mut [])
        .unwrap();

    bob.username = "alice".to_string();
    let err = services.borrowers.delete_borrower(bob.clone()).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::NotFound(LookupKey::BorrowerId(id)) if id == bob.id
    ));
    assert_eq!(borrower_rows(&conn, "alice"), 1);
    assert_eq!(borrower_rows(&conn, "bob"), 1);
}

#[test]
fn linking_deleted_borrower_leaves_both_sides_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    let (_, mut nineteen) = books(&services);
    let mut alice = services
        .borrowers
        .add_borrower("alice", "Alice", "Johnson", &mut [])
        .unwrap();
    services.borrowers.delete_borrower(alice.clone()).unwrap();

    let err = services
        .books
        .add_borrower(&mut nineteen, &mut alice)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!nineteen.is_borrowed_by(alice.id));
    assert!(!alice.has_borrowed(nineteen.id));
    assert_eq!(link_rows(&conn), 0);
}

#[test]
fn borrowing_deleted_book_leaves_both_sides_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    let (mut hobbit, mut nineteen) = books(&services);
    let mut bob = services
        .borrowers
        .add_borrower("bob", "Bob", "Smith", &mut [&mut nineteen])
        .unwrap();
    conn.execute("DELETE FROM books WHERE id = ?1;", [hobbit.id])
        .unwrap();

    let err = services
        .borrowers
        .borrow_book(&mut bob, &mut hobbit)
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::NotFound(LookupKey::BookId(id)) if id == hobbit.id
    ));
    assert_eq!(bob.borrowed_books(), &[nineteen.id]);
    assert!(!hobbit.is_borrowed_by(bob.id));
    assert_eq!(link_rows(&conn), 1);
}

#[test]
fn failed_return_restores_link_in_original_order() {
    let conn = open_db_in_memory().unwrap();
    let services = LibraryServices::try_new(&conn).unwrap();
    let (mut hobbit, mut nineteen) = books(&services);
    let mut bob = services
        .borrowers
        .add_borrower("bob", "Bob", "Smith", &mut [&mut hobbit, &mut nineteen])
        .unwrap();
    conn.execute("DELETE FROM books WHERE id = ?1;", [nineteen.id])
        .unwrap();

    let err = services
        .borrowers
        .return_book(&mut bob, &mut hobbit)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(bob.borrowed_books(), &[hobbit.id, nineteen.id]);
    assert!(bob.has_borrowed(hobbit.id));
    assert!(hobbit.is_borrowed_by(bob.id));
    assert_eq!(
        services.books.get_book_by_id(hobbit.id).unwrap().borrowers(),
        &[bob.id]
    );
}
