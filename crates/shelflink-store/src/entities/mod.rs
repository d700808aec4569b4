//! Entity trait implementations and composing stores
//!
//! Entities whose queries never go beyond the generic CRUD set are used
//! through a bare `EntityStore<E>`. The rest compose one and add their
//! custom finders next to it.

pub mod book;
pub mod catalog;
pub mod commerce;

pub use book::BookStore;
pub use catalog::AuthorStore;
pub use commerce::{OrderItemStore, OrderStore};
