//! Seed file schema
//!
//! Version 0. Entity rows reuse the draft structs from shelflink-core with
//! an explicit id alongside, flattened so seed YAML reads naturally:
//!
//! ```yaml
//! schema_version: 0
//! authors:
//!   - { id: 1, name: "Toni Morrison" }
//! books:
//!   - { id: 5, title: "Beloved", price: 11.5 }
//! links:
//!   - { relation: book-author, owner: 5, target: 1 }
//! ```

use serde::{Deserialize, Serialize};
use shelflink_core::model::{
    AuthorDraft, BookDraft, CustomerDraft, GenreDraft, LocationDraft, OrderDraft, OrderItemDraft,
    PublisherDraft, SalesRateDraft,
};

/// The seed schema version this build understands
pub const SEED_SCHEMA_VERSION: u32 = 0;

/// One entity row in a seed: explicit id plus the entity's draft fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedRow<D> {
    pub id: i64,
    #[serde(flatten)]
    pub draft: D,
}

/// One membership link in a seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedLink {
    /// Relation kind (`book-author`, `book-genre`, `book-location`)
    pub relation: String,
    /// Owner entity id
    pub owner: i64,
    /// Target entity id
    pub target: i64,
    /// Payload for kinds that carry one (`book-location` quantity)
    #[serde(default)]
    pub payload: Option<i64>,
}

/// A complete parsed seed file
///
/// Every section defaults to empty, so minimal seeds only name what they
/// ship. Section order here also fixes import order: referenced tables
/// first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedFile {
    pub schema_version: u32,
    #[serde(default)]
    pub publishers: Vec<SeedRow<PublisherDraft>>,
    #[serde(default)]
    pub authors: Vec<SeedRow<AuthorDraft>>,
    #[serde(default)]
    pub genres: Vec<SeedRow<GenreDraft>>,
    #[serde(default)]
    pub locations: Vec<SeedRow<LocationDraft>>,
    #[serde(default)]
    pub customers: Vec<SeedRow<CustomerDraft>>,
    #[serde(default)]
    pub sales_rates: Vec<SeedRow<SalesRateDraft>>,
    #[serde(default)]
    pub books: Vec<SeedRow<BookDraft>>,
    #[serde(default)]
    pub orders: Vec<SeedRow<OrderDraft>>,
    #[serde(default)]
    pub order_items: Vec<SeedRow<OrderItemDraft>>,
    #[serde(default)]
    pub links: Vec<SeedLink>,
}

impl SeedFile {
    /// Total number of entity rows across all sections
    pub fn entity_count(&self) -> usize {
        self.publishers.len()
            + self.authors.len()
            + self.genres.len()
            + self.locations.len()
            + self.customers.len()
            + self.sales_rates.len()
            + self.books.len()
            + self.orders.len()
            + self.order_items.len()
    }
}
