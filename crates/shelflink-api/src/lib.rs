//! Shelflink API - HTTP surface
//!
//! JSON routes over the catalog stores, the relation store, and the
//! reconcile/aggregate commands. Handlers are synchronous database work
//! behind async extractors; the connection mutex is never held across an
//! await.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
