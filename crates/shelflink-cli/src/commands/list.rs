//! Entity listing command
//!
//! Usage: shelflink list <ENTITY>
//!
//! Prints one line per row: id, label, then one `kind: labels` column per
//! relation the entity owns ("-" when the row has no links of that kind).

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use shelflink_engine::commands::aggregate::aggregate_entity;
use shelflink_store::catalog::bookstore_registry;
use shelflink_store::RelationStore;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Entity name (book, author, genre, publisher, location, customer)
    pub entity: String,
}

/// Execute list command
pub fn execute(args: ListArgs, db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conn = shelflink_store::db::open(db)?;
    let relations = RelationStore::new(Arc::new(bookstore_registry()?));

    let rows = aggregate_entity(&relations, &conn, &args.entity)?;
    for row in &rows {
        print!("{}\t{}", row.owner.id, row.owner.label);
        for (kind, labels) in &row.related {
            print!("\t{}: {}", kind, labels.as_deref().unwrap_or("-"));
        }
        println!();
    }
    println!("{} {} row(s)", rows.len(), args.entity);
    Ok(())
}
