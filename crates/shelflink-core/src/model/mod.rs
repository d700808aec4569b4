pub mod book;
pub mod catalog;
pub mod commerce;
pub mod link;

pub use book::{Book, BookDraft};
pub use catalog::{
    Author, AuthorDraft, Genre, GenreDraft, Location, LocationDraft, Publisher, PublisherDraft,
};
pub use commerce::{
    Customer, CustomerDraft, Order, OrderDraft, OrderItem, OrderItemDraft, SalesRate,
    SalesRateDraft,
};
pub use link::{AggregateRow, Link, OwnerRecord, ReconcileOutcome, TargetRecord};

/// Entities that expose a single human-readable display label
///
/// The label is the only entity attribute the aggregation layer reads;
/// everything else is pass-through data owned by the CRUD layer.
pub trait Labeled {
    fn label(&self) -> &str;
}
