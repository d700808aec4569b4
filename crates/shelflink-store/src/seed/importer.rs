//! Seed application
//!
//! Entities are upserted in dependency order (referenced tables first),
//! then link references are verified in batch, then links are inserted.
//! A link whose pair already exists is left untouched, payload included,
//! so re-importing a seed never rewrites live data.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::Connection;
use shelflink_core::errors::{Result, ShelfError};
use shelflink_core::model::{
    Author, Book, Customer, Genre, Location, Order, OrderItem, Publisher, SalesRate,
};

use crate::entity::{Entity, EntityStore};
use crate::relation::RelationStore;
use crate::seed::digest::compute_seed_digest;
use crate::seed::format::{SeedFile, SeedRow};

/// Outcome of one seed import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedImportSummary {
    /// Entity rows upserted
    pub entities: usize,
    /// Links newly inserted
    pub links_added: usize,
    /// Links whose pair already existed and was left untouched
    pub links_existing: usize,
    /// Canonical content digest of the seed
    pub digest: String,
}

/// Import a parsed seed into the database
///
/// # Errors
/// `UnknownReference` when a link names an entity id that exists neither in
/// the seed nor in the database; storage errors pass through.
pub fn import_seed(
    conn: &Connection,
    relations: &RelationStore,
    seed: &SeedFile,
) -> Result<SeedImportSummary> {
    upsert_section::<Publisher>(conn, &seed.publishers)?;
    upsert_section::<Author>(conn, &seed.authors)?;
    upsert_section::<Genre>(conn, &seed.genres)?;
    upsert_section::<Location>(conn, &seed.locations)?;
    upsert_section::<Customer>(conn, &seed.customers)?;
    upsert_section::<SalesRate>(conn, &seed.sales_rates)?;
    upsert_section::<Book>(conn, &seed.books)?;
    upsert_section::<Order>(conn, &seed.orders)?;
    upsert_section::<OrderItem>(conn, &seed.order_items)?;

    verify_link_references(conn, relations, seed)?;

    let mut links_added = 0;
    let mut links_existing = 0;
    for link in &seed.links {
        match relations.add_link(conn, &link.relation, link.owner, link.target, link.payload) {
            Ok(_) => links_added += 1,
            Err(ShelfError::DuplicateLink { .. }) => links_existing += 1,
            Err(e) => return Err(e),
        }
    }

    let digest = compute_seed_digest(seed);
    tracing::info!(
        entities = seed.entity_count(),
        links_added,
        links_existing,
        digest = %digest,
        "seed imported"
    );

    Ok(SeedImportSummary {
        entities: seed.entity_count(),
        links_added,
        links_existing,
        digest,
    })
}

fn upsert_section<E: Entity>(conn: &Connection, rows: &[SeedRow<E::Draft>]) -> Result<()> {
    let store = EntityStore::<E>::new();
    for row in rows {
        store.upsert(conn, row.id, &row.draft)?;
    }
    Ok(())
}

/// Check every link endpoint against the database in batched queries
///
/// Runs after the entity upserts, so ids defined by the seed itself and ids
/// that pre-existed in the database both count as resolvable.
fn verify_link_references(
    conn: &Connection,
    relations: &RelationStore,
    seed: &SeedFile,
) -> Result<()> {
    let mut ids_by_entity: BTreeMap<String, BTreeSet<i64>> = BTreeMap::new();
    for link in &seed.links {
        let def = relations.registry().relation(&link.relation)?;
        ids_by_entity
            .entry(def.owner_entity.clone())
            .or_default()
            .insert(link.owner);
        ids_by_entity
            .entry(def.target_entity.clone())
            .or_default()
            .insert(link.target);
    }

    for (entity, ids) in &ids_by_entity {
        let missing = relations.missing_references(conn, entity, ids)?;
        if let Some(id) = missing.first() {
            return Err(ShelfError::UnknownReference {
                entity: entity.clone(),
                id: *id,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::bookstore_registry;
    use crate::seed::parser::parse_seed_str;
    use crate::{db, schema};

    #[test]
    fn test_import_then_reimport_is_idempotent() {
        let conn = db::open_in_memory().unwrap();
        schema::ensure_schema(&conn).unwrap();
        let registry = Arc::new(bookstore_registry().unwrap());
        let relations = RelationStore::new(registry.clone());

        let seed = parse_seed_str(
            r#"
schema_version: 0
authors:
  - { id: 1, name: "Toni Morrison" }
books:
  - { id: 5, title: "Beloved", price: 11.5 }
links:
  - { relation: book-author, owner: 5, target: 1 }
"#,
            &registry,
        )
        .unwrap();

        let first = import_seed(&conn, &relations, &seed).unwrap();
        assert_eq!(first.entities, 2);
        assert_eq!(first.links_added, 1);
        assert_eq!(first.links_existing, 0);

        let second = import_seed(&conn, &relations, &seed).unwrap();
        assert_eq!(second.links_added, 0);
        assert_eq!(second.links_existing, 1);
        assert_eq!(first.digest, second.digest);
    }
}
