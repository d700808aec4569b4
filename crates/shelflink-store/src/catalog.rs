//! The bookstore relation catalog
//!
//! Central declaration of every entity and junction-backed relation the
//! store knows about. Built once at startup; nothing else in the workspace
//! hardcodes a junction table name or column.

use shelflink_core::registry::{EntityDef, RelationDef, RelationRegistry};
use shelflink_core::Result;

/// Relation kind joining books to their authors
pub const BOOK_AUTHOR: &str = "book-author";
/// Relation kind joining books to their genres
pub const BOOK_GENRE: &str = "book-genre";
/// Relation kind joining books to stocked locations; payload is the quantity
pub const BOOK_LOCATION: &str = "book-location";

/// Build the registry for the bookstore schema
pub fn bookstore_registry() -> Result<RelationRegistry> {
    let mut registry = RelationRegistry::new();

    registry.register_entity(EntityDef::new("book", "books", "title"))?;
    registry.register_entity(EntityDef::new("author", "authors", "name"))?;
    registry.register_entity(EntityDef::new("genre", "genres", "name"))?;
    registry.register_entity(EntityDef::new("publisher", "publishers", "name"))?;
    registry.register_entity(EntityDef::new("location", "locations", "name"))?;
    registry.register_entity(EntityDef::new("customer", "customers", "name"))?;
    registry.register_entity(EntityDef::new("sales_rate", "sales_rates", "county"))?;

    registry.register_relation(RelationDef {
        kind: BOOK_AUTHOR.to_string(),
        owner_entity: "book".to_string(),
        target_entity: "author".to_string(),
        table: "book_authors".to_string(),
        owner_column: "book_id".to_string(),
        target_column: "author_id".to_string(),
        payload_column: None,
    })?;

    registry.register_relation(RelationDef {
        kind: BOOK_GENRE.to_string(),
        owner_entity: "book".to_string(),
        target_entity: "genre".to_string(),
        table: "book_genres".to_string(),
        owner_column: "book_id".to_string(),
        target_column: "genre_id".to_string(),
        payload_column: None,
    })?;

    registry.register_relation(RelationDef {
        kind: BOOK_LOCATION.to_string(),
        owner_entity: "book".to_string(),
        target_entity: "location".to_string(),
        table: "book_locations".to_string(),
        owner_column: "book_id".to_string(),
        target_column: "location_id".to_string(),
        payload_column: Some("quantity".to_string()),
    })?;

    Ok(registry)
}
