//! Aggregated list projection.
//!
//! Every requested kind is validated against the registry before any
//! database work, then the store runs one batched label query per kind and
//! the results fold into per-owner derived fields. An empty owner list
//! returns an empty projection without touching the database.

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;

use rusqlite::Connection;
use shelflink_core::errors::Result;
use shelflink_core::labels;
use shelflink_core::model::{AggregateRow, OwnerRecord};
use shelflink_store::RelationStore;

/// Project related-label fields onto a batch of owner rows
///
/// Returns one row per owner, in input order. Each row carries one derived
/// field per requested kind: the sorted, deduplicated target labels joined
/// with `", "`, or `None` for an owner with no links of that kind.
pub fn aggregate(
    relations: &RelationStore,
    conn: &Connection,
    owners: &[OwnerRecord],
    kinds: &[String],
) -> Result<Vec<AggregateRow>> {
    for kind in kinds {
        relations.registry().relation(kind)?;
    }
    if owners.is_empty() {
        return Ok(Vec::new());
    }

    let owner_ids: Vec<i64> = owners.iter().map(|o| o.id).collect();
    let mut fetched = BTreeMap::new();
    for kind in kinds {
        let pairs = relations.fetch_labels(conn, kind, &owner_ids)?;
        fetched.insert(kind.clone(), pairs);
    }

    tracing::debug!(
        owners = owners.len(),
        kinds = kinds.len(),
        "projected related labels"
    );
    Ok(labels::project(owners, &fetched))
}

/// Aggregate every row of one owner entity across all kinds it owns
pub fn aggregate_entity(
    relations: &RelationStore,
    conn: &Connection,
    entity: &str,
) -> Result<Vec<AggregateRow>> {
    let owners = relations.owner_records(conn, entity)?;
    let kinds: Vec<String> = relations
        .registry()
        .relations_owned_by(entity)
        .iter()
        .map(|def| def.kind.clone())
        .collect();
    aggregate(relations, conn, &owners, &kinds)
}
