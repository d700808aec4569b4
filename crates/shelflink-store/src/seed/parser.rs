//! Seed parsing and structural validation
//!
//! Parsing checks everything that can be verified without a database:
//! schema version, per-section id uniqueness, known relation kinds, and
//! payload legality. Reference existence is the importer's job, where
//! pre-existing database rows also count.

use std::collections::BTreeSet;
use std::path::Path;

use shelflink_core::registry::RelationRegistry;

use crate::errors::{seed_invalid, Result};
use crate::seed::format::{SeedFile, SeedRow, SEED_SCHEMA_VERSION};

/// Parse and validate a seed from a YAML string
pub fn parse_seed_str(input: &str, registry: &RelationRegistry) -> Result<SeedFile> {
    let seed: SeedFile = serde_yaml::from_str(input)
        .map_err(|e| seed_invalid(format!("YAML parse error: {e}")))?;
    validate_seed(&seed, registry)?;
    Ok(seed)
}

/// Parse and validate a seed file from disk
pub fn parse_seed_file<P: AsRef<Path>>(path: P, registry: &RelationRegistry) -> Result<SeedFile> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path)
        .map_err(|e| seed_invalid(format!("cannot read {}: {e}", path.display())))?;
    parse_seed_str(&input, registry)
}

/// Validate the structure of a parsed seed
pub fn validate_seed(seed: &SeedFile, registry: &RelationRegistry) -> Result<()> {
    if seed.schema_version != SEED_SCHEMA_VERSION {
        return Err(seed_invalid(format!(
            "unsupported schema_version {} (expected {})",
            seed.schema_version, SEED_SCHEMA_VERSION
        )));
    }

    check_unique_ids("publisher", &seed.publishers)?;
    check_unique_ids("author", &seed.authors)?;
    check_unique_ids("genre", &seed.genres)?;
    check_unique_ids("location", &seed.locations)?;
    check_unique_ids("customer", &seed.customers)?;
    check_unique_ids("sales_rate", &seed.sales_rates)?;
    check_unique_ids("book", &seed.books)?;
    check_unique_ids("order", &seed.orders)?;
    check_unique_ids("order_item", &seed.order_items)?;

    let mut seen_pairs = BTreeSet::new();
    for link in &seed.links {
        let def = registry.relation(&link.relation).map_err(|_| {
            seed_invalid(format!("unknown relation kind in links: {}", link.relation))
        })?;
        if link.payload.is_some() && !def.has_payload() {
            return Err(seed_invalid(format!(
                "relation {} does not carry a payload (owner {}, target {})",
                link.relation, link.owner, link.target
            )));
        }
        if !seen_pairs.insert((link.relation.clone(), link.owner, link.target)) {
            return Err(seed_invalid(format!(
                "duplicate link: {} owner {} target {}",
                link.relation, link.owner, link.target
            )));
        }
    }

    Ok(())
}

fn check_unique_ids<D>(section: &str, rows: &[SeedRow<D>]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for row in rows {
        if !seen.insert(row.id) {
            return Err(seed_invalid(format!(
                "duplicate {section} id: {}",
                row.id
            )));
        }
    }
    Ok(())
}
