//! Link inspection and editing commands
//!
//! Usage: shelflink links list <KIND> <OWNER_ID>
//!        shelflink links add <KIND> <OWNER_ID> <TARGET_ID> [--payload N]
//!        shelflink links rm <KIND> <OWNER_ID> <TARGET_ID>

use std::path::Path;
use std::sync::Arc;

use clap::{Args, Subcommand};
use rusqlite::Connection;
use shelflink_store::catalog::bookstore_registry;
use shelflink_store::RelationStore;

#[derive(Debug, Args)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinksCommand {
    /// Show every link one owner holds for a kind
    List(ListArgs),
    /// Add a single link
    Add(AddArgs),
    /// Remove a single link
    Rm(RmArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Relation kind, e.g. book-author
    pub kind: String,

    /// Owner entity id
    pub owner_id: i64,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Relation kind, e.g. book-location
    pub kind: String,

    /// Owner entity id
    pub owner_id: i64,

    /// Target entity id
    pub target_id: i64,

    /// Payload value, only for kinds that carry one
    #[arg(long)]
    pub payload: Option<i64>,
}

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Relation kind
    pub kind: String,

    /// Owner entity id
    pub owner_id: i64,

    /// Target entity id
    pub target_id: i64,
}

/// Execute links command
pub fn execute(args: LinksArgs, db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conn = shelflink_store::db::open(db)?;
    let relations = RelationStore::new(Arc::new(bookstore_registry()?));

    match args.command {
        LinksCommand::List(list_args) => execute_list(list_args, &conn, &relations),
        LinksCommand::Add(add_args) => execute_add(add_args, &conn, &relations),
        LinksCommand::Rm(rm_args) => execute_rm(rm_args, &conn, &relations),
    }
}

fn execute_list(
    args: ListArgs,
    conn: &Connection,
    relations: &RelationStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let links = relations.links_for_owner(conn, &args.kind, args.owner_id)?;
    for link in &links {
        match link.payload {
            Some(payload) => println!(
                "{}\t{} -> {}\tpayload {}",
                link.id, link.owner_id, link.target_id, payload
            ),
            None => println!("{}\t{} -> {}", link.id, link.owner_id, link.target_id),
        }
    }
    println!("{} link(s)", links.len());
    Ok(())
}

fn execute_add(
    args: AddArgs,
    conn: &Connection,
    relations: &RelationStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let link_id = relations.add_link(conn, &args.kind, args.owner_id, args.target_id, args.payload)?;
    println!("✓ Linked {} -> {} (link {})", args.owner_id, args.target_id, link_id);
    Ok(())
}

fn execute_rm(
    args: RmArgs,
    conn: &Connection,
    relations: &RelationStore,
) -> Result<(), Box<dyn std::error::Error>> {
    if relations.remove_link(conn, &args.kind, args.owner_id, args.target_id)? {
        println!("✓ Unlinked {} -> {}", args.owner_id, args.target_id);
        Ok(())
    } else {
        Err(format!(
            "no {} link from {} to {}",
            args.kind, args.owner_id, args.target_id
        )
        .into())
    }
}
