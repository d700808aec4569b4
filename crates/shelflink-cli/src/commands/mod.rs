//! CLI command implementations

pub mod init;
pub mod links;
pub mod list;
pub mod seed;
pub mod sync;
