//! Shelflink CLI
//!
//! Command-line interface for Shelflink

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "shelflink")]
#[command(about = "Shelflink - inventory relationship management", long_about = None)]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, default_value = "shelflink.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the database and its schema
    Init,
    /// Seed import operations
    Seed(commands::seed::SeedArgs),
    /// List entity rows with their related labels
    List(commands::list::ListArgs),
    /// Reconcile one owner's links against a desired target set
    Sync(commands::sync::SyncArgs),
    /// Inspect and edit individual links
    Links(commands::links::LinksArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli.db),
        Commands::Seed(args) => commands::seed::execute(args, &cli.db),
        Commands::List(args) => commands::list::execute(args, &cli.db),
        Commands::Sync(args) => commands::sync::execute(args, &cli.db),
        Commands::Links(args) => commands::links::execute(args, &cli.db),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
