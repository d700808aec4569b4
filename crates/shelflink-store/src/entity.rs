//! Generic entity persistence
//!
//! The CRUD surface every catalog entity shares is implemented exactly once
//! here. Entities describe their table shape through the [`Entity`] trait;
//! stores that need custom queries compose an [`EntityStore`] rather than
//! reimplementing the basics (see `entities/`).

use std::marker::PhantomData;

use rusqlite::{params_from_iter, Connection, OptionalExtension, Row, ToSql};
use shelflink_core::errors::{Result, ShelfError};

use crate::errors::{from_rusqlite, is_fk_violation};

/// Table description and row mapping for one catalog entity
///
/// `from_row` receives rows shaped `SELECT id, <COLUMNS...>`: the id at
/// index 0 followed by `COLUMNS` in declaration order. `bind` must return
/// one parameter per entry in `COLUMNS`, in the same order.
pub trait Entity: Sized {
    /// Caller-supplied fields for create and update
    type Draft;

    /// Entity name used in error reporting (`"book"`)
    const ENTITY: &'static str;
    /// Backing table
    const TABLE: &'static str;
    /// Non-id columns in declaration order
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn bind(draft: &Self::Draft) -> Vec<&dyn ToSql>;

    /// Field-level validation run before any insert or update
    fn validate(_draft: &Self::Draft) -> Result<()> {
        Ok(())
    }
}

/// Generic `{list, find, insert, update, delete}` over an [`Entity`]
///
/// Stateless; the connection is passed per call so one instance can serve
/// any database.
pub struct EntityStore<E: Entity> {
    _marker: PhantomData<E>,
}

impl<E: Entity> EntityStore<E> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    fn select_sql() -> String {
        format!("SELECT id, {} FROM {}", E::COLUMNS.join(", "), E::TABLE)
    }

    fn insert_sql() -> String {
        let placeholders: Vec<String> = (1..=E::COLUMNS.len()).map(|i| format!("?{i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            E::COLUMNS.join(", "),
            placeholders.join(", ")
        )
    }

    fn upsert_sql() -> String {
        let placeholders: Vec<String> =
            (2..=E::COLUMNS.len() + 1).map(|i| format!("?{i}")).collect();
        let assignments: Vec<String> = E::COLUMNS
            .iter()
            .map(|col| format!("{col} = excluded.{col}"))
            .collect();
        format!(
            "INSERT INTO {} (id, {}) VALUES (?1, {}) ON CONFLICT(id) DO UPDATE SET {}",
            E::TABLE,
            E::COLUMNS.join(", "),
            placeholders.join(", "),
            assignments.join(", ")
        )
    }

    fn update_sql() -> String {
        let assignments: Vec<String> = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{} = ?{}", col, i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            E::TABLE,
            assignments.join(", "),
            E::COLUMNS.len() + 1
        )
    }

    /// List all rows, ascending by id
    pub fn list(&self, conn: &Connection) -> Result<Vec<E>> {
        let sql = format!("{} ORDER BY id", Self::select_sql());
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| from_rusqlite("list", e))?;
        let rows = stmt
            .query_map([], |row| E::from_row(row))
            .map_err(|e| from_rusqlite("list", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("list", e))?;
        Ok(rows)
    }

    /// Find a row by id
    pub fn find(&self, conn: &Connection, id: i64) -> Result<Option<E>> {
        let sql = format!("{} WHERE id = ?1", Self::select_sql());
        conn.query_row(&sql, [id], |row| E::from_row(row))
            .optional()
            .map_err(|e| from_rusqlite("find", e))
    }

    /// Get a row by id, failing with `NotFound` when absent
    pub fn get(&self, conn: &Connection, id: i64) -> Result<E> {
        self.find(conn, id)?
            .ok_or_else(|| ShelfError::not_found(E::ENTITY, id))
    }

    /// True when a row with this id exists
    pub fn exists(&self, conn: &Connection, id: i64) -> Result<bool> {
        let sql = format!("SELECT 1 FROM {} WHERE id = ?1", E::TABLE);
        let found = conn
            .query_row(&sql, [id], |_| Ok(()))
            .optional()
            .map_err(|e| from_rusqlite("exists", e))?;
        Ok(found.is_some())
    }

    /// Number of rows in the table
    pub fn count(&self, conn: &Connection) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        conn.query_row(&sql, [], |row| row.get(0))
            .map_err(|e| from_rusqlite("count", e))
    }

    /// Insert a new row, returning its assigned id
    ///
    /// # Errors
    /// `InvalidInput` on validation failure or a violated foreign key;
    /// `StorageUnavailable` for other database failures.
    pub fn insert(&self, conn: &Connection, draft: &E::Draft) -> Result<i64> {
        E::validate(draft)?;
        conn.execute(&Self::insert_sql(), params_from_iter(E::bind(draft)))
            .map_err(|e| classify_write_error("insert", E::TABLE, e))?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert or overwrite a row with an explicit id (seed import path)
    pub fn upsert(&self, conn: &Connection, id: i64, draft: &E::Draft) -> Result<()> {
        E::validate(draft)?;
        let id_param: &dyn ToSql = &id;
        let params = std::iter::once(id_param).chain(E::bind(draft));
        conn.execute(&Self::upsert_sql(), params_from_iter(params))
            .map_err(|e| classify_write_error("upsert", E::TABLE, e))?;
        Ok(())
    }

    /// Update an existing row
    ///
    /// # Errors
    /// `NotFound` when no row has this id.
    pub fn update(&self, conn: &Connection, id: i64, draft: &E::Draft) -> Result<()> {
        E::validate(draft)?;
        let id_param: &dyn ToSql = &id;
        let params = E::bind(draft).into_iter().chain(std::iter::once(id_param));
        let changed = conn
            .execute(&Self::update_sql(), params_from_iter(params))
            .map_err(|e| classify_write_error("update", E::TABLE, e))?;
        if changed == 0 {
            return Err(ShelfError::not_found(E::ENTITY, id));
        }
        Ok(())
    }

    /// Delete a row; returns whether anything was deleted
    pub fn delete(&self, conn: &Connection, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
        let changed = conn
            .execute(&sql, [id])
            .map_err(|e| classify_write_error("delete", E::TABLE, e))?;
        Ok(changed > 0)
    }
}

impl<E: Entity> Clone for EntityStore<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: Entity> Default for EntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn classify_write_error(op: &str, table: &str, err: rusqlite::Error) -> ShelfError {
    if is_fk_violation(&err) {
        return ShelfError::invalid_input(format!(
            "foreign key constraint failed on {op} into {table}"
        ));
    }
    from_rusqlite(op, err)
}
