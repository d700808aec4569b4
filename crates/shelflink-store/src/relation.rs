//! Junction-table link persistence
//!
//! One implementation serves every registered relation kind: table and
//! column names come from the registry, caller values only ever travel as
//! bound parameters. Reads are single round trips; the batched label fetch
//! backing the aggregator issues one query per id chunk, never one per
//! owner.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use shelflink_core::errors::{Result, ShelfError};
use shelflink_core::model::{Link, OwnerRecord, TargetRecord};
use shelflink_core::registry::{RelationDef, RelationRegistry};

use crate::errors::{from_rusqlite, is_fk_violation, is_unique_violation};

/// Upper bound on ids per IN (...) clause, below SQLite's parameter cap
const SQL_BATCH_SIZE: usize = 500;

/// Store for membership links across all registered relation kinds
///
/// Holds only the registry; the connection is passed per call. Every
/// operation resolves its relation kind first, so unknown kinds fail with
/// `UnknownRelationKind` before any SQL is issued.
#[derive(Debug, Clone)]
pub struct RelationStore {
    registry: Arc<RelationRegistry>,
}

impl RelationStore {
    pub fn new(registry: Arc<RelationRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this store was built around
    pub fn registry(&self) -> &RelationRegistry {
        &self.registry
    }

    /// Target ids currently linked to an owner
    pub fn list_links(&self, conn: &Connection, kind: &str, owner_id: i64) -> Result<BTreeSet<i64>> {
        let def = self.registry.relation(kind)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            def.target_column, def.table, def.owner_column
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| from_rusqlite("list_links", e))?;
        let ids = stmt
            .query_map([owner_id], |row| row.get::<_, i64>(0))
            .map_err(|e| from_rusqlite("list_links", e))?
            .collect::<std::result::Result<BTreeSet<_>, _>>()
            .map_err(|e| from_rusqlite("list_links", e))?;
        Ok(ids)
    }

    /// Owner ids currently linked to a target (the reverse direction)
    pub fn list_links_by_target(
        &self,
        conn: &Connection,
        kind: &str,
        target_id: i64,
    ) -> Result<BTreeSet<i64>> {
        let def = self.registry.relation(kind)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            def.owner_column, def.table, def.target_column
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| from_rusqlite("list_links_by_target", e))?;
        let ids = stmt
            .query_map([target_id], |row| row.get::<_, i64>(0))
            .map_err(|e| from_rusqlite("list_links_by_target", e))?
            .collect::<std::result::Result<BTreeSet<_>, _>>()
            .map_err(|e| from_rusqlite("list_links_by_target", e))?;
        Ok(ids)
    }

    /// Full link rows for one owner, ascending by target id
    pub fn links_for_owner(
        &self,
        conn: &Connection,
        kind: &str,
        owner_id: i64,
    ) -> Result<Vec<Link>> {
        let def = self.registry.relation(kind)?;
        let sql = format!(
            "SELECT id, {owner}, {target}, {payload}, created_at
             FROM {table}
             WHERE {owner} = ?1
             ORDER BY {target}",
            owner = def.owner_column,
            target = def.target_column,
            payload = payload_expr(def),
            table = def.table,
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| from_rusqlite("links_for_owner", e))?;
        let links = stmt
            .query_map([owner_id], |row| read_link(row, kind))
            .map_err(|e| from_rusqlite("links_for_owner", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("links_for_owner", e))?;
        Ok(links)
    }

    /// Get one link by its surrogate id
    ///
    /// Surrogate ids are scoped to the kind's junction table, so the kind is
    /// part of the address.
    ///
    /// # Errors
    /// `NotFound` when no link row has this id.
    pub fn get_link(&self, conn: &Connection, kind: &str, link_id: i64) -> Result<Link> {
        let def = self.registry.relation(kind)?;
        let sql = format!(
            "SELECT id, {owner}, {target}, {payload}, created_at
             FROM {table}
             WHERE id = ?1",
            owner = def.owner_column,
            target = def.target_column,
            payload = payload_expr(def),
            table = def.table,
        );
        conn.query_row(&sql, [link_id], |row| read_link(row, kind))
            .optional()
            .map_err(|e| from_rusqlite("get_link", e))?
            .ok_or_else(|| link_not_found(kind, link_id))
    }

    /// Insert a membership link, returning its surrogate id
    ///
    /// # Errors
    /// `DuplicateLink` when the (owner, target) pair already exists;
    /// `UnknownReference` when either side does not resolve to a row;
    /// `InvalidInput` when a payload is supplied for a kind without a
    /// payload column.
    pub fn add_link(
        &self,
        conn: &Connection,
        kind: &str,
        owner_id: i64,
        target_id: i64,
        payload: Option<i64>,
    ) -> Result<i64> {
        let def = self.registry.relation(kind)?;
        let created_at = Utc::now().timestamp_millis();

        let result = match &def.payload_column {
            Some(payload_column) => {
                let sql = format!(
                    "INSERT INTO {} ({}, {}, {}, created_at) VALUES (?1, ?2, ?3, ?4)",
                    def.table, def.owner_column, def.target_column, payload_column
                );
                conn.execute(
                    &sql,
                    params![owner_id, target_id, payload.unwrap_or(0), created_at],
                )
            }
            None => {
                if payload.is_some() {
                    return Err(ShelfError::invalid_input(format!(
                        "relation {kind} does not carry a payload"
                    )));
                }
                let sql = format!(
                    "INSERT INTO {} ({}, {}, created_at) VALUES (?1, ?2, ?3)",
                    def.table, def.owner_column, def.target_column
                );
                conn.execute(&sql, params![owner_id, target_id, created_at])
            }
        };

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => Err(ShelfError::DuplicateLink {
                relation: kind.to_string(),
                owner_id,
                target_id,
            }),
            Err(e) if is_fk_violation(&e) => {
                Err(self.missing_side(conn, def, owner_id, target_id))
            }
            Err(e) => Err(from_rusqlite("add_link", e)),
        }
    }

    /// Delete the link for an (owner, target) pair
    ///
    /// Idempotent: returns whether a row was actually deleted.
    pub fn remove_link(
        &self,
        conn: &Connection,
        kind: &str,
        owner_id: i64,
        target_id: i64,
    ) -> Result<bool> {
        let def = self.registry.relation(kind)?;
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1 AND {} = ?2",
            def.table, def.owner_column, def.target_column
        );
        let changed = conn
            .execute(&sql, params![owner_id, target_id])
            .map_err(|e| from_rusqlite("remove_link", e))?;
        Ok(changed > 0)
    }

    /// Delete a link by its surrogate id; returns whether a row was deleted
    pub fn remove_link_by_id(&self, conn: &Connection, kind: &str, link_id: i64) -> Result<bool> {
        let def = self.registry.relation(kind)?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", def.table);
        let changed = conn
            .execute(&sql, [link_id])
            .map_err(|e| from_rusqlite("remove_link_by_id", e))?;
        Ok(changed > 0)
    }

    /// Point an existing link at a different (owner, target) pair
    ///
    /// The surrogate id, payload, and creation timestamp stay in place.
    ///
    /// # Errors
    /// `DuplicateLink` when the new pair collides with an existing link;
    /// `UnknownReference` when either side does not resolve to a row;
    /// `NotFound` when the link id does not exist.
    pub fn retarget_link(
        &self,
        conn: &Connection,
        kind: &str,
        link_id: i64,
        owner_id: i64,
        target_id: i64,
    ) -> Result<()> {
        let def = self.registry.relation(kind)?;
        let sql = format!(
            "UPDATE {} SET {} = ?1, {} = ?2 WHERE id = ?3",
            def.table, def.owner_column, def.target_column
        );
        let changed = match conn.execute(&sql, params![owner_id, target_id, link_id]) {
            Ok(changed) => changed,
            Err(e) if is_unique_violation(&e) => {
                return Err(ShelfError::DuplicateLink {
                    relation: kind.to_string(),
                    owner_id,
                    target_id,
                })
            }
            Err(e) if is_fk_violation(&e) => {
                return Err(self.missing_side(conn, def, owner_id, target_id))
            }
            Err(e) => return Err(from_rusqlite("retarget_link", e)),
        };
        if changed == 0 {
            return Err(link_not_found(kind, link_id));
        }
        Ok(())
    }

    /// Overwrite the payload of an existing link
    ///
    /// This is ordinary CRUD on the payload column; reconciliation neither
    /// reads nor writes it.
    ///
    /// # Errors
    /// `InvalidInput` when the kind has no payload column; `NotFound` when
    /// the link id does not exist.
    pub fn set_link_payload(
        &self,
        conn: &Connection,
        kind: &str,
        link_id: i64,
        payload: i64,
    ) -> Result<()> {
        let def = self.registry.relation(kind)?;
        let Some(payload_column) = &def.payload_column else {
            return Err(ShelfError::invalid_input(format!(
                "relation {kind} does not carry a payload"
            )));
        };
        let sql = format!("UPDATE {} SET {} = ?1 WHERE id = ?2", def.table, payload_column);
        let changed = conn
            .execute(&sql, params![payload, link_id])
            .map_err(|e| from_rusqlite("set_link_payload", e))?;
        if changed == 0 {
            return Err(link_not_found(kind, link_id));
        }
        Ok(())
    }

    /// Fetch `(owner_id, target_label)` pairs for a batch of owners
    ///
    /// One INNER JOIN across the junction and target tables per id chunk;
    /// this is the only query shape the aggregator uses.
    pub fn fetch_labels(
        &self,
        conn: &Connection,
        kind: &str,
        owner_ids: &[i64],
    ) -> Result<Vec<(i64, String)>> {
        let def = self.registry.relation(kind)?;
        let target = self.registry.entity(&def.target_entity)?;

        let mut pairs = Vec::new();
        for chunk in owner_ids.chunks(SQL_BATCH_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT j.{owner}, t.{label}
                 FROM {junction} j
                 INNER JOIN {target_table} t ON t.id = j.{target}
                 WHERE j.{owner} IN ({placeholders})",
                owner = def.owner_column,
                label = target.label_column,
                junction = def.table,
                target_table = target.table,
                target = def.target_column,
            );
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| from_rusqlite("fetch_labels", e))?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter()), |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|e| from_rusqlite("fetch_labels", e))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| from_rusqlite("fetch_labels", e))?;
            pairs.extend(rows);
        }
        Ok(pairs)
    }

    /// Targets linked to one owner, with labels, ascending by label then id
    pub fn target_records(
        &self,
        conn: &Connection,
        kind: &str,
        owner_id: i64,
    ) -> Result<Vec<TargetRecord>> {
        let def = self.registry.relation(kind)?;
        let target = self.registry.entity(&def.target_entity)?;
        let sql = format!(
            "SELECT t.id, t.{label}
             FROM {junction} j
             INNER JOIN {target_table} t ON t.id = j.{target}
             WHERE j.{owner} = ?1
             ORDER BY t.{label}, t.id",
            label = target.label_column,
            junction = def.table,
            target_table = target.table,
            target = def.target_column,
            owner = def.owner_column,
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| from_rusqlite("target_records", e))?;
        let records = stmt
            .query_map([owner_id], |row| {
                Ok(TargetRecord {
                    id: row.get(0)?,
                    label: row.get(1)?,
                })
            })
            .map_err(|e| from_rusqlite("target_records", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("target_records", e))?;
        Ok(records)
    }

    /// Every row of one entity as an `(id, label)` owner record, ascending by id
    ///
    /// This is the owner side of an aggregated listing; the caller decides
    /// which relation kinds to project over it.
    pub fn owner_records(&self, conn: &Connection, entity: &str) -> Result<Vec<OwnerRecord>> {
        let def = self.registry.entity(entity)?;
        let sql = format!(
            "SELECT id, {} FROM {} ORDER BY id",
            def.label_column, def.table
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| from_rusqlite("owner_records", e))?;
        let records = stmt
            .query_map([], |row| {
                Ok(OwnerRecord {
                    id: row.get(0)?,
                    label: row.get(1)?,
                })
            })
            .map_err(|e| from_rusqlite("owner_records", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("owner_records", e))?;
        Ok(records)
    }

    /// True when the entity row exists
    pub fn entity_exists(&self, conn: &Connection, entity: &str, id: i64) -> Result<bool> {
        let def = self.registry.entity(entity)?;
        let sql = format!("SELECT 1 FROM {} WHERE id = ?1", def.table);
        let found = conn
            .query_row(&sql, [id], |_| Ok(()))
            .optional()
            .map_err(|e| from_rusqlite("entity_exists", e))?;
        Ok(found.is_some())
    }

    /// Subset of `ids` that do not resolve to existing entity rows, sorted
    pub fn missing_references(
        &self,
        conn: &Connection,
        entity: &str,
        ids: &BTreeSet<i64>,
    ) -> Result<Vec<i64>> {
        let def = self.registry.entity(entity)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list: Vec<i64> = ids.iter().copied().collect();
        let mut found = BTreeSet::new();
        for chunk in id_list.chunks(SQL_BATCH_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT id FROM {} WHERE id IN ({placeholders})",
                def.table
            );
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| from_rusqlite("missing_references", e))?;
            let ids_found = stmt
                .query_map(params_from_iter(chunk.iter()), |row| row.get::<_, i64>(0))
                .map_err(|e| from_rusqlite("missing_references", e))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| from_rusqlite("missing_references", e))?;
            found.extend(ids_found);
        }

        Ok(ids.difference(&found).copied().collect())
    }

    /// A write tripped the junction's foreign keys; name the side that does
    /// not resolve. Falls back to the probe's own error if that read fails.
    fn missing_side(
        &self,
        conn: &Connection,
        def: &RelationDef,
        owner_id: i64,
        target_id: i64,
    ) -> ShelfError {
        match self.entity_exists(conn, &def.owner_entity, owner_id) {
            Ok(false) => ShelfError::UnknownReference {
                entity: def.owner_entity.clone(),
                id: owner_id,
            },
            Ok(true) => ShelfError::UnknownReference {
                entity: def.target_entity.clone(),
                id: target_id,
            },
            Err(e) => e,
        }
    }
}

fn payload_expr(def: &RelationDef) -> &str {
    def.payload_column.as_deref().unwrap_or("NULL")
}

fn link_not_found(kind: &str, link_id: i64) -> ShelfError {
    ShelfError::not_found(format!("{kind} link"), link_id)
}

fn read_link(row: &rusqlite::Row<'_>, kind: &str) -> rusqlite::Result<Link> {
    let created_at_ms: i64 = row.get(4)?;
    Ok(Link {
        id: row.get(0)?,
        relation: kind.to_string(),
        owner_id: row.get(1)?,
        target_id: row.get(2)?,
        payload: row.get(3)?,
        created_at: chrono::DateTime::from_timestamp_millis(created_at_ms)
            .unwrap_or_else(chrono::Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{bookstore_registry, BOOK_AUTHOR, BOOK_LOCATION};
    use crate::{db, schema};

    fn setup() -> (Connection, RelationStore) {
        let conn = db::open_in_memory().unwrap();
        schema::ensure_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO books (id, title, price) VALUES (5, 'Beloved', 11.5);
             INSERT INTO authors (id, name) VALUES (1, 'Toni Morrison'), (2, 'A.N. Other');
             INSERT INTO locations (id, name) VALUES (2, 'Downtown');",
        )
        .unwrap();
        let store = RelationStore::new(Arc::new(bookstore_registry().unwrap()));
        (conn, store)
    }

    #[test]
    fn test_add_then_list() {
        let (conn, store) = setup();
        store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap();
        store.add_link(&conn, BOOK_AUTHOR, 5, 2, None).unwrap();

        let targets = store.list_links(&conn, BOOK_AUTHOR, 5).unwrap();
        assert_eq!(targets, BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_duplicate_pair_is_typed() {
        let (conn, store) = setup();
        store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap();

        let err = store.add_link(&conn, BOOK_AUTHOR, 5, 1, None).unwrap_err();
        assert_eq!(
            err,
            ShelfError::DuplicateLink {
                relation: BOOK_AUTHOR.to_string(),
                owner_id: 5,
                target_id: 1,
            }
        );
    }

    #[test]
    fn test_unknown_kind_fails_before_sql() {
        let (conn, store) = setup();
        let err = store.list_links(&conn, "book-reviewer", 5).unwrap_err();
        assert_eq!(err.code(), "ERR_UNKNOWN_RELATION_KIND");
    }

    #[test]
    fn test_payload_only_for_declared_kinds() {
        let (conn, store) = setup();
        let err = store
            .add_link(&conn, BOOK_AUTHOR, 5, 1, Some(3))
            .unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_INPUT");

        let link_id = store
            .add_link(&conn, BOOK_LOCATION, 5, 2, Some(3))
            .unwrap();
        let link = store.get_link(&conn, BOOK_LOCATION, link_id).unwrap();
        assert_eq!(link.payload, Some(3));
    }
}
