//! Database bootstrap command
//!
//! Usage: shelflink init [--db <PATH>]

use std::path::Path;

/// Execute init command
pub fn execute(db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conn = shelflink_store::db::open(db)?;
    shelflink_store::schema::ensure_schema(&conn)?;
    println!("✓ Initialized {}", db.display());
    Ok(())
}
