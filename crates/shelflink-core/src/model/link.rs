use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Link - one membership fact tying an owner to a target under a relation kind
///
/// Links carry a surrogate `id` so they can be addressed directly by the link
/// CRUD surface. The `(owner_id, target_id)` pair is unique per junction
/// table. `payload` is opaque to reconciliation: only relation kinds that
/// declare a payload column populate it (`book-location` stores the stocked
/// quantity there), and reconcile add/remove never reads or rewrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Surrogate row id, scoped to the relation's junction table
    pub id: i64,

    /// Relation kind this link belongs to (e.g. `book-author`)
    pub relation: String,

    /// Owning entity row id
    pub owner_id: i64,

    /// Target entity row id
    pub target_id: i64,

    /// Opaque attachment for kinds with a payload column, `None` otherwise
    pub payload: Option<i64>,

    /// Timestamp when this link was created; survives reconciliation of
    /// untouched pairs
    pub created_at: DateTime<Utc>,
}

/// Owner-side projection input: id plus display label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerRecord {
    pub id: i64,
    pub label: String,
}

impl OwnerRecord {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Target-side read model returned by per-owner relation lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub id: i64,
    pub label: String,
}

impl TargetRecord {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// One aggregated output row: the owner plus a derived label field per
/// requested relation kind
///
/// `related` maps relation kind to the sorted, deduplicated, `", "`-joined
/// labels of the owner's linked targets, or `None` when the owner has no
/// links of that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub owner: OwnerRecord,
    pub related: BTreeMap<String, Option<String>>,
}

/// Result of one reconciliation run: the target ids actually inserted and
/// deleted
///
/// Ordered sets keep reporting deterministic. An untouched membership yields
/// two empty sets, which is how idempotence shows up to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub added: BTreeSet<i64>,
    pub removed: BTreeSet<i64>,
}

impl ReconcileOutcome {
    /// Outcome of a run that changed nothing
    pub fn noop() -> Self {
        Self::default()
    }

    /// True when the run applied no inserts and no deletes
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_outcome() {
        let outcome = ReconcileOutcome::noop();
        assert!(outcome.is_noop());

        let outcome = ReconcileOutcome {
            added: BTreeSet::from([4]),
            removed: BTreeSet::new(),
        };
        assert!(!outcome.is_noop());
    }

    #[test]
    fn test_outcome_serializes_as_sorted_arrays() {
        let outcome = ReconcileOutcome {
            added: BTreeSet::from([9, 4]),
            removed: BTreeSet::from([1]),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["added"], serde_json::json!([4, 9]));
        assert_eq!(json["removed"], serde_json::json!([1]));
    }
}
