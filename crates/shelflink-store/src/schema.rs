//! Embedded schema bootstrap
//!
//! The full schema is applied idempotently on startup; every statement is
//! `IF NOT EXISTS`, so re-running against a populated database is a no-op.
//! Junction tables follow one shape: surrogate id, owner id, target id,
//! optional payload column, creation timestamp, and a UNIQUE constraint on
//! the (owner, target) pair.

use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};

/// Complete database schema
pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS publishers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS genres (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT
);

CREATE TABLE IF NOT EXISTS sales_rates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    county TEXT NOT NULL,
    rate REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    isbn TEXT,
    price REAL NOT NULL,
    publication_year INTEGER,
    publisher_id INTEGER REFERENCES publishers(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    placed_on TEXT NOT NULL,
    sales_rate_id INTEGER REFERENCES sales_rates(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS order_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    quantity INTEGER NOT NULL,
    unit_price REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS book_authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL,
    UNIQUE (book_id, author_id)
);

CREATE TABLE IF NOT EXISTS book_genres (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL,
    UNIQUE (book_id, genre_id)
);

CREATE TABLE IF NOT EXISTS book_locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
    quantity INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    UNIQUE (book_id, location_id)
);

CREATE INDEX IF NOT EXISTS idx_book_authors_author ON book_authors (author_id);
CREATE INDEX IF NOT EXISTS idx_book_genres_genre ON book_genres (genre_id);
CREATE INDEX IF NOT EXISTS idx_book_locations_location ON book_locations (location_id);
CREATE INDEX IF NOT EXISTS idx_books_publisher ON books (publisher_id);
CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items (order_id);
";

/// Apply the embedded schema to a connection
///
/// Safe to call on every startup and against already-initialized databases.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| from_rusqlite("ensure_schema", e))?;
    tracing::debug!("schema ensured");
    Ok(())
}
