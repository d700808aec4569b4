//! Seed import command
//!
//! Usage: shelflink seed import <PATH>

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Subcommand};
use rusqlite::Connection;
use shelflink_store::catalog::bookstore_registry;
use shelflink_store::seed::{import_seed, parse_seed_file};
use shelflink_store::RelationStore;

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Import a seed file into the database
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to seed YAML file or directory
    pub path: PathBuf,
}

/// Execute seed command
pub fn execute(args: SeedArgs, db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        SeedCommand::Import(import_args) => execute_import(import_args, db),
    }
}

/// Execute seed import
fn execute_import(args: ImportArgs, db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conn = shelflink_store::db::open(db)?;
    shelflink_store::schema::ensure_schema(&conn)?;
    let relations = RelationStore::new(Arc::new(bookstore_registry()?));

    if args.path.is_dir() {
        // Import directory of seeds (sorted for determinism)
        let mut seed_files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();

        seed_files.sort();

        for seed_file in seed_files {
            import_one(&seed_file, &conn, &relations)?;
        }
    } else {
        import_one(&args.path, &conn, &relations)?;
    }

    Ok(())
}

fn import_one(
    path: &Path,
    conn: &Connection,
    relations: &RelationStore,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Importing {}...", path.display());
    let seed = parse_seed_file(path, relations.registry())?;
    let summary = import_seed(conn, relations, &seed)?;
    println!(
        "✓ Imported {} entities, {} links ({} already present, digest: {})",
        summary.entities, summary.links_added, summary.links_existing, summary.digest
    );
    Ok(())
}
