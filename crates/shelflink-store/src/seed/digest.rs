//! Seed digest canonicalization
//!
//! Computes stable SHA256 digests of seeds for reproducibility. The digest
//! depends only on content: YAML formatting, section ordering, and link
//! ordering never change it.

use sha2::{Digest, Sha256};

use crate::seed::format::SeedFile;

/// Compute a stable digest for a seed
///
/// Returns a SHA256 hex digest of the canonicalized seed representation.
pub fn compute_seed_digest(seed: &SeedFile) -> String {
    let canonical = canonicalize_seed(seed);

    let json = serde_json::to_string(&canonical).expect("Failed to serialize canonical seed");

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();

    hex::encode(result)
}

/// Canonicalize a seed for deterministic digest calculation
///
/// Entity sections sort by id, links by (relation, owner, target).
fn canonicalize_seed(seed: &SeedFile) -> SeedFile {
    let mut canonical = seed.clone();
    canonical.publishers.sort_by_key(|row| row.id);
    canonical.authors.sort_by_key(|row| row.id);
    canonical.genres.sort_by_key(|row| row.id);
    canonical.locations.sort_by_key(|row| row.id);
    canonical.customers.sort_by_key(|row| row.id);
    canonical.sales_rates.sort_by_key(|row| row.id);
    canonical.books.sort_by_key(|row| row.id);
    canonical.orders.sort_by_key(|row| row.id);
    canonical.order_items.sort_by_key(|row| row.id);
    canonical
        .links
        .sort_by(|a, b| (&a.relation, a.owner, a.target).cmp(&(&b.relation, b.owner, b.target)));
    canonical
}
