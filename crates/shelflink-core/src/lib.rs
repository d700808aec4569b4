//! Shelflink Core - Domain model and pure relationship logic
//!
//! This crate provides the foundational data structures and pure operations
//! for Shelflink, including:
//! - Entity models for the bookstore catalog (books, authors, genres, ...)
//! - Link, owner, and aggregate-row types shared by every layer
//! - The relation registry describing entities and junction-backed relations
//! - Set-difference membership planning for reconciliation
//! - Label folding for aggregated list projections
//!
//! Everything here is storage-agnostic; persistence lives in `shelflink-store`
//! and orchestration in `shelflink-engine`.

pub mod errors;
pub mod labels;
pub mod logging;
pub mod membership;
pub mod model;
pub mod registry;
pub mod rules;

// Re-export commonly used types
pub use errors::{Result, ShelfError};
pub use membership::{diff_membership, MembershipDiff};
pub use model::{AggregateRow, Link, OwnerRecord, ReconcileOutcome, TargetRecord};
pub use registry::{EntityDef, RelationDef, RelationRegistry};
