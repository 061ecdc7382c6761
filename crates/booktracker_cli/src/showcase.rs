//! Scripted lending walkthrough printed to stdout.

use booktracker_core::{Author, Book, Borrower, Genre, LibraryServices, ServiceError, Session};
use log::warn;
use std::collections::BTreeMap;

const ISBN_1984: &str = "9780451524935";
const ISBN_HOBBIT: &str = "9780547928227";

pub fn preload_data(session: &mut Session) {
    let result = session.unit_of_work("preload", |conn| -> Result<(), ServiceError> {
        let services = LibraryServices::try_new(conn)?;

        let mut tolkien = services
            .authors
            .add_author("J.R.R. Tolkien", "British author of LOTR and The Hobbit.")?;
        let mut orwell = services.authors.add_author(
            "George Orwell",
            "English novelist, author of 1984 and Animal Farm.",
        )?;
        let mut rowling = services
            .authors
            .add_author("J.K. Rowling", "British author of the Harry Potter series.")?;

        let books = &services.books;
        books.add_book("The Hobbit", ISBN_HOBBIT, &mut tolkien, Genre::Fantasy)?;
        books.add_book(
            "The Lord of the Rings",
            "9780618640157",
            &mut tolkien,
            Genre::Fantasy,
        )?;
        books.add_book("1984", ISBN_1984, &mut orwell, Genre::Dystopia)?;
        books.add_book("Animal Farm", "9780451526342", &mut orwell, Genre::Dystopia)?;
        books.add_book(
            "Harry Potter and the Philosopher's Stone",
            "9780747532699",
            &mut rowling,
            Genre::Fantasy,
        )?;

        services
            .borrowers
            .add_borrower("alice", "Alice", "Johnson", &mut [])?;
        services
            .borrowers
            .add_borrower("bob", "Bob", "Smith", &mut [])?;
        Ok(())
    });

    match result {
        Ok(()) => println!("Sample data preloaded successfully."),
        Err(err) => report("preload", &err),
    }
}

pub fn run(session: &mut Session) {
    println!("-- Initial authors and their books --");
    print_authors(session);
    println!("-- All books --");
    print_books(session);

    println!("-- Borrowing some books --");
    let result = session.unit_of_work("borrow", |conn| -> Result<(), ServiceError> {
        let services = LibraryServices::try_new(conn)?;
        let mut alice = services.borrowers.get_borrower_by_username("alice")?;
        let mut bob = services.borrowers.get_borrower_by_username("bob")?;
        let mut nineteen = services.books.get_book_by_isbn(ISBN_1984)?;
        let mut hobbit = services.books.get_book_by_isbn(ISBN_HOBBIT)?;

        services.books.add_borrower(&mut nineteen, &mut alice)?;
        services.books.add_borrower(&mut nineteen, &mut bob)?;
        services.books.add_borrower(&mut hobbit, &mut alice)?;
        Ok(())
    });
    finish("borrow", result, "-- Borrowing completed. --\n");
    print_books(session);

    println!("-- Demonstrating idempotent linking (no duplicates) --");
    let result = session.unit_of_work("relink", |conn| -> Result<(), ServiceError> {
        let services = LibraryServices::try_new(conn)?;
        let mut nineteen = services.books.get_book_by_isbn(ISBN_1984)?;
        let mut alice = services.borrowers.get_borrower_by_username("alice")?;
        services.books.add_borrower(&mut nineteen, &mut alice)
    });
    finish(
        "relink",
        result,
        "Re-linked Alice to 1984. Should remain unique.\n",
    );
    print_books(session);

    println!("-- Removing a borrower from a book (bidirectional update) --");
    let result = session.unit_of_work("return", |conn| -> Result<(), ServiceError> {
        let services = LibraryServices::try_new(conn)?;
        let mut nineteen = services.books.get_book_by_isbn(ISBN_1984)?;
        let mut bob = services.borrowers.get_borrower_by_username("bob")?;
        services.borrowers.return_book(&mut bob, &mut nineteen)?;
        Ok(())
    });
    finish("return", result, "Bob returned '1984'.\n");
    print_books(session);

    println!("-- Final status of books, authors and borrowers --");
    print_authors(session);
    print_books(session);
    print_borrowers(session);
}

fn finish(step: &str, result: Result<(), ServiceError>, message: &str) {
    match result {
        Ok(()) => println!("{message}"),
        Err(err) => report(step, &err),
    }
}

fn report(step: &str, err: &ServiceError) {
    warn!(
        "event=showcase_step module=cli status=error step={} kind={:?} error={}",
        step,
        err.kind(),
        err
    );
    eprintln!("{step} failed: {err}");
}

fn print_authors(session: &Session) {
    let listing = load(session, |services| {
        let titles = titles_by_id(&services.books.get_all_books()?);
        Ok(services
            .authors
            .get_all_authors()?
            .iter()
            .map(|author| render_author(author, &titles))
            .collect::<Vec<_>>())
    });
    print_listing("authors", listing);
}

fn print_books(session: &Session) {
    let listing = load(session, |services| {
        let authors: BTreeMap<i64, String> = services
            .authors
            .get_all_authors()?
            .into_iter()
            .map(|author| (author.id, author.name))
            .collect();
        let usernames: BTreeMap<i64, String> = match services.borrowers.get_all_borrowers() {
            Ok(borrowers) => borrowers
                .into_iter()
                .map(|borrower| (borrower.id, borrower.username))
                .collect(),
            Err(ServiceError::NotFound(_)) => BTreeMap::new(),
            Err(err) => return Err(err),
        };
        Ok(services
            .books
            .get_all_books()?
            .iter()
            .map(|book| render_book(book, &authors, &usernames))
            .collect::<Vec<_>>())
    });
    print_listing("books", listing);
}

fn print_borrowers(session: &Session) {
    let listing = load(session, |services| {
        let titles = titles_by_id(&services.books.get_all_books()?);
        Ok(services
            .borrowers
            .get_all_borrowers()?
            .iter()
            .map(|borrower| render_borrower(borrower, &titles))
            .collect::<Vec<_>>())
    });
    print_listing("borrowers", listing);
}

fn load<T>(
    session: &Session,
    read: impl FnOnce(&LibraryServices<'_>) -> Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    let services = LibraryServices::try_new(session.connection())?;
    read(&services)
}

fn print_listing(what: &str, listing: Result<Vec<String>, ServiceError>) {
    match listing {
        Ok(entries) => {
            for entry in entries {
                println!("{entry}");
            }
            println!();
        }
        Err(err) => report(what, &err),
    }
}

fn titles_by_id(books: &[Book]) -> BTreeMap<i64, String> {
    books
        .iter()
        .map(|book| (book.id, book.title.clone()))
        .collect()
}

fn join_or(ids: &[i64], names: &BTreeMap<i64, String>, empty: &str) -> String {
    if ids.is_empty() {
        return empty.to_string();
    }
    ids.iter()
        .filter_map(|id| names.get(id).cloned())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_author(author: &Author, titles: &BTreeMap<i64, String>) -> String {
    format!(
        "Author:\nName - {}\nBio - {}\nBooks: {}\n",
        author.name,
        author.bio,
        join_or(author.books(), titles, "No books")
    )
}

fn render_book(
    book: &Book,
    authors: &BTreeMap<i64, String>,
    usernames: &BTreeMap<i64, String>,
) -> String {
    let author = authors
        .get(&book.author_id())
        .map(String::as_str)
        .unwrap_or("unknown");
    format!(
        "Book:\nAuthor - {}\nTitle - {}\nGenre - {}\nISBN: {}\nBorrowers: {}\n",
        author,
        book.title,
        book.genre,
        book.isbn,
        join_or(book.borrowers(), usernames, "No borrowers")
    )
}

fn render_borrower(borrower: &Borrower, titles: &BTreeMap<i64, String>) -> String {
    format!(
        "Borrower:\nUsername - {}\nFirst name - {}\nLast name - {}\nBorrowed books: {}\n",
        borrower.username,
        borrower.first_name,
        borrower.last_name,
        join_or(borrower.borrowed_books(), titles, "No borrowed books")
    )
}
