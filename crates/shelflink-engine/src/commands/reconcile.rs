//! Membership reconciliation.
//!
//! ## Pipeline (in order):
//! 1. Resolve the relation kind (unknown kinds fail before any SQL)
//! 2. Verify the owner row exists
//! 3. Verify every desired target resolves (one batched query)
//! 4. Read current membership and diff against the desired set
//! 5. Apply removes, ascending by target id
//! 6. Apply adds, ascending by target id
//!
//! No wrapping transaction: a write failure mid-apply surfaces as
//! `ReconcileInterrupted` carrying exactly what had been applied, and those
//! applied writes stay visible in the database.

#![allow(clippy::result_large_err)]

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::Connection;
use shelflink_core::errors::{Result, ShelfError};
use shelflink_core::membership::diff_membership;
use shelflink_core::model::ReconcileOutcome;
use shelflink_store::RelationStore;

/// Reconcile one owner's membership in one relation kind to `desired`
///
/// Links whose target is in both the current and desired sets are never
/// written: their surrogate ids, payloads, and timestamps stay in place.
/// New links for payload-carrying kinds start at the payload default.
///
/// # Errors
/// `UnknownRelationKind` for an unregistered kind; `UnknownReference` when
/// the owner or any desired target does not resolve (checked before any
/// write); `ReconcileInterrupted` when a write fails mid-apply.
pub fn reconcile(
    relations: &RelationStore,
    conn: &Connection,
    kind: &str,
    owner_id: i64,
    desired: &BTreeSet<i64>,
) -> Result<ReconcileOutcome> {
    let def = relations.registry().relation(kind)?;

    if !relations.entity_exists(conn, &def.owner_entity, owner_id)? {
        return Err(ShelfError::UnknownReference {
            entity: def.owner_entity.clone(),
            id: owner_id,
        });
    }
    let missing = relations.missing_references(conn, &def.target_entity, desired)?;
    if let Some(&id) = missing.first() {
        return Err(ShelfError::UnknownReference {
            entity: def.target_entity.clone(),
            id,
        });
    }

    let actual = relations.list_links(conn, kind, owner_id)?;
    let diff = diff_membership(&actual, desired);
    if diff.is_noop() {
        tracing::debug!(kind, owner_id, "membership already matches");
        return Ok(ReconcileOutcome::noop());
    }

    let mut applied = ReconcileOutcome::noop();
    for &target_id in &diff.to_remove {
        match relations.remove_link(conn, kind, owner_id, target_id) {
            Ok(_) => {
                applied.removed.insert(target_id);
            }
            Err(e) => return Err(interrupted(kind, owner_id, applied, e)),
        }
    }
    for &target_id in &diff.to_add {
        match relations.add_link(conn, kind, owner_id, target_id, None) {
            Ok(_) => {
                applied.added.insert(target_id);
            }
            Err(e) => return Err(interrupted(kind, owner_id, applied, e)),
        }
    }

    tracing::info!(
        kind,
        owner_id,
        added = applied.added.len(),
        removed = applied.removed.len(),
        "membership reconciled"
    );
    Ok(applied)
}

/// Reconcile several relation kinds for one owner, in kind order
///
/// Kinds are applied one at a time; there is no atomicity across kinds. On
/// failure the error for the failing kind surfaces and the outcomes already
/// applied for earlier kinds stand.
pub fn reconcile_all(
    relations: &RelationStore,
    conn: &Connection,
    owner_id: i64,
    desired_by_kind: &BTreeMap<String, BTreeSet<i64>>,
) -> Result<BTreeMap<String, ReconcileOutcome>> {
    let mut outcomes = BTreeMap::new();
    for (kind, desired) in desired_by_kind {
        let outcome = reconcile(relations, conn, kind, owner_id, desired)?;
        outcomes.insert(kind.clone(), outcome);
    }
    Ok(outcomes)
}

fn interrupted(
    kind: &str,
    owner_id: i64,
    applied: ReconcileOutcome,
    source: ShelfError,
) -> ShelfError {
    ShelfError::ReconcileInterrupted {
        relation: kind.to_string(),
        owner_id,
        added: applied.added.into_iter().collect(),
        removed: applied.removed.into_iter().collect(),
        source: Box::new(source),
    }
}
