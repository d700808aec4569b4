use rusqlite::{Connection, Row, ToSql};
use shelflink_core::errors::Result;
use shelflink_core::model::{Book, BookDraft};
use shelflink_core::rules;

use crate::entity::{Entity, EntityStore};
use crate::errors::from_rusqlite;

impl Entity for Book {
    type Draft = BookDraft;

    const ENTITY: &'static str = "book";
    const TABLE: &'static str = "books";
    const COLUMNS: &'static [&'static str] =
        &["title", "isbn", "price", "publication_year", "publisher_id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Book {
            id: row.get(0)?,
            title: row.get(1)?,
            isbn: row.get(2)?,
            price: row.get(3)?,
            publication_year: row.get(4)?,
            publisher_id: row.get(5)?,
        })
    }

    fn bind(draft: &BookDraft) -> Vec<&dyn ToSql> {
        vec![
            &draft.title,
            &draft.isbn,
            &draft.price,
            &draft.publication_year,
            &draft.publisher_id,
        ]
    }

    fn validate(draft: &BookDraft) -> Result<()> {
        rules::validate_label("title", &draft.title)?;
        rules::validate_money("price", draft.price)
    }
}

/// Book store: generic CRUD plus the title search and publisher listing
#[derive(Clone, Default)]
pub struct BookStore {
    pub base: EntityStore<Book>,
}

impl BookStore {
    pub fn new() -> Self {
        Self {
            base: EntityStore::new(),
        }
    }

    /// Case-insensitive substring search on the title
    ///
    /// The fragment is a bound parameter composed into the pattern inside
    /// SQL, so `%` or quotes in user input have no structural effect.
    pub fn search_by_title(&self, conn: &Connection, fragment: &str) -> Result<Vec<Book>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, title, isbn, price, publication_year, publisher_id
                 FROM books
                 WHERE title LIKE '%' || ?1 || '%'
                 ORDER BY title, id",
            )
            .map_err(|e| from_rusqlite("search_by_title", e))?;

        let books = stmt
            .query_map([fragment], |row| Book::from_row(row))
            .map_err(|e| from_rusqlite("search_by_title", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("search_by_title", e))?;
        Ok(books)
    }

    /// All books published by one publisher, ascending by id
    pub fn by_publisher(&self, conn: &Connection, publisher_id: i64) -> Result<Vec<Book>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, title, isbn, price, publication_year, publisher_id
                 FROM books
                 WHERE publisher_id = ?1
                 ORDER BY id",
            )
            .map_err(|e| from_rusqlite("by_publisher", e))?;

        let books = stmt
            .query_map([publisher_id], |row| Book::from_row(row))
            .map_err(|e| from_rusqlite("by_publisher", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("by_publisher", e))?;
        Ok(books)
    }
}
