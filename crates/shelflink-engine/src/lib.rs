//! Shelflink engine - orchestration layer
//!
//! Provides high-level reconciliation and aggregation commands that
//! coordinate between core domain logic and the persistence layer.

pub mod commands;
