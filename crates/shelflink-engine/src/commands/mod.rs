//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and the persistence layer.

pub mod aggregate;
pub mod reconcile;
