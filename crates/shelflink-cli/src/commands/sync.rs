//! Membership sync command
//!
//! Usage: shelflink sync <KIND> <OWNER_ID> --targets 2,3
//!
//! Omitting --targets reconciles against the empty set, which removes every
//! link of that kind for the owner.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use clap::Args;
use shelflink_engine::commands::reconcile::reconcile;
use shelflink_store::catalog::bookstore_registry;
use shelflink_store::RelationStore;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Relation kind, e.g. book-author
    pub kind: String,

    /// Owner entity id
    pub owner_id: i64,

    /// Desired target ids, comma separated
    #[arg(long, value_delimiter = ',')]
    pub targets: Vec<i64>,
}

/// Execute sync command
pub fn execute(args: SyncArgs, db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conn = shelflink_store::db::open(db)?;
    let relations = RelationStore::new(Arc::new(bookstore_registry()?));

    let desired: BTreeSet<i64> = args.targets.iter().copied().collect();
    let outcome = reconcile(&relations, &conn, &args.kind, args.owner_id, &desired)?;

    if outcome.is_noop() {
        println!("Already in sync: {} owner {}", args.kind, args.owner_id);
    } else {
        let added: Vec<String> = outcome.added.iter().map(|id| id.to_string()).collect();
        let removed: Vec<String> = outcome.removed.iter().map(|id| id.to_string()).collect();
        println!(
            "✓ Synced {} owner {}: added [{}], removed [{}]",
            args.kind,
            args.owner_id,
            added.join(", "),
            removed.join(", ")
        );
    }
    Ok(())
}
