//! Set-difference membership planning
//!
//! The reconciler's planning half: given the target ids currently linked to
//! an owner and the caller's desired target ids, compute the minimal insert
//! and delete sets. Pure and storage-free; applying the plan is the engine's
//! job.

use std::collections::BTreeSet;

/// Minimal change plan moving actual membership to desired membership
///
/// Ids present in both input sets appear in neither output set; those links
/// are left completely untouched by reconciliation, preserving surrogate
/// ids, payloads, and creation timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    /// Target ids to insert (desired minus actual)
    pub to_add: BTreeSet<i64>,
    /// Target ids to delete (actual minus desired)
    pub to_remove: BTreeSet<i64>,
}

impl MembershipDiff {
    /// True when actual already equals desired
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Total number of write operations this plan implies
    pub fn change_count(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

/// Compute the minimal membership diff between actual and desired target sets
///
/// # Arguments
/// * `actual` - target ids currently linked to the owner
/// * `desired` - target ids the caller wants linked afterwards
///
/// # Returns
/// The [`MembershipDiff`] whose removal set is `actual - desired` and whose
/// addition set is `desired - actual`.
pub fn diff_membership(actual: &BTreeSet<i64>, desired: &BTreeSet<i64>) -> MembershipDiff {
    MembershipDiff {
        to_add: desired.difference(actual).copied().collect(),
        to_remove: actual.difference(desired).copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_minimal_diff_preserves_intersection() {
        let diff = diff_membership(&set(&[1, 2, 3]), &set(&[2, 3, 4]));

        assert_eq!(diff.to_remove, set(&[1]));
        assert_eq!(diff.to_add, set(&[4]));
        // 2 and 3 sit in the intersection and appear in neither set
        assert!(!diff.to_add.contains(&2));
        assert!(!diff.to_remove.contains(&3));
        assert_eq!(diff.change_count(), 2);
    }

    #[test]
    fn test_identical_sets_are_a_noop() {
        let diff = diff_membership(&set(&[2, 3]), &set(&[2, 3]));
        assert!(diff.is_noop());
        assert_eq!(diff.change_count(), 0);
    }

    #[test]
    fn test_empty_desired_removes_everything() {
        let diff = diff_membership(&set(&[1, 2]), &set(&[]));
        assert_eq!(diff.to_remove, set(&[1, 2]));
        assert!(diff.to_add.is_empty());
    }

    #[test]
    fn test_empty_actual_adds_everything() {
        let diff = diff_membership(&set(&[]), &set(&[7, 8]));
        assert_eq!(diff.to_add, set(&[7, 8]));
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn test_disjoint_sets_replace_everything() {
        let diff = diff_membership(&set(&[1, 2]), &set(&[3, 4]));
        assert_eq!(diff.to_remove, set(&[1, 2]));
        assert_eq!(diff.to_add, set(&[3, 4]));
    }

    #[test]
    fn test_add_and_remove_sets_are_disjoint() {
        let actual = set(&[1, 2, 3, 5, 8]);
        let desired = set(&[2, 3, 4, 8, 9]);
        let diff = diff_membership(&actual, &desired);
        assert!(diff.to_add.is_disjoint(&diff.to_remove));
        assert!(diff.to_add.is_subset(&desired));
        assert!(diff.to_remove.is_subset(&actual));
    }
}
