//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(|e| from_rusqlite("open", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(|e| from_rusqlite("open_in_memory", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Configure a connection with the settings every Shelflink process assumes
pub fn configure(conn: &Connection) -> Result<()> {
    // Junction tables rely on foreign keys for cascade deletes
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| from_rusqlite("configure", e))?;

    // WAL mode for better concurrency between reader and writer processes
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| from_rusqlite("configure", e))?;

    conn.busy_timeout(Duration::from_secs(5))
        .map_err(|e| from_rusqlite("configure", e))?;

    Ok(())
}
