//! Label folding for aggregated list projections
//!
//! The aggregator's pure half: the store fetches `(owner_id, label)` pairs in
//! one batched query per relation kind, and these functions fold them into
//! per-owner derived fields. Ordering is deterministic for any input order.

use std::collections::BTreeMap;

use crate::model::{AggregateRow, OwnerRecord};

/// Fold target labels into one derived field value
///
/// Labels are sorted ascending, deduplicated, and joined with `", "`.
/// Returns `None` for an empty list, which callers render as null rather
/// than an empty string.
pub fn join_labels(mut labels: Vec<String>) -> Option<String> {
    if labels.is_empty() {
        return None;
    }
    labels.sort();
    labels.dedup();
    Some(labels.join(", "))
}

/// Group fetched `(owner_id, label)` pairs by owner
pub fn group_by_owner(pairs: Vec<(i64, String)>) -> BTreeMap<i64, Vec<String>> {
    let mut grouped: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for (owner_id, label) in pairs {
        grouped.entry(owner_id).or_default().push(label);
    }
    grouped
}

/// Assemble aggregate rows from owners and per-kind fetched label pairs
///
/// # Arguments
/// * `owners` - the owner rows being projected, in caller order
/// * `fetched` - for each relation kind, the `(owner_id, label)` pairs the
///   store returned for these owners
///
/// # Returns
/// One [`AggregateRow`] per owner, in input order, holding a derived field
/// for every kind present in `fetched` (`None` where an owner has no links).
pub fn project(
    owners: &[OwnerRecord],
    fetched: &BTreeMap<String, Vec<(i64, String)>>,
) -> Vec<AggregateRow> {
    let mut grouped: BTreeMap<&str, BTreeMap<i64, Vec<String>>> = BTreeMap::new();
    for (kind, pairs) in fetched {
        grouped.insert(kind.as_str(), group_by_owner(pairs.clone()));
    }

    owners
        .iter()
        .map(|owner| {
            let related = grouped
                .iter()
                .map(|(kind, by_owner)| {
                    let labels = by_owner.get(&owner.id).cloned().unwrap_or_default();
                    (kind.to_string(), join_labels(labels))
                })
                .collect();
            AggregateRow {
                owner: owner.clone(),
                related,
            }
        })
        .collect()
}
