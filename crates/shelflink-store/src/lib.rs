//! Shelflink Store - SQLite persistence layer
//!
//! Provides:
//! - Connection management and idempotent schema bootstrap
//! - A generic entity store implementing `{list, get, insert, update,
//!   delete}` once, composed by entity-specific stores with custom finders
//! - The relation store: junction-table link CRUD, batched label fetches,
//!   and reference existence checks
//! - YAML seed parsing and import with a canonical content digest
//!
//! All SQL goes through bound parameters; no caller value is ever spliced
//! into statement text.

pub mod catalog;
pub mod db;
pub mod entities;
pub mod entity;
pub mod errors;
pub mod relation;
pub mod schema;
pub mod seed;

// Re-export key types
pub use entity::{Entity, EntityStore};
pub use errors::Result;
pub use relation::RelationStore;
