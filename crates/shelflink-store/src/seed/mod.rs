//! YAML seed import
//!
//! Seeds carry explicit entity ids so re-imports are stable: entities are
//! upserted, links inserted idempotently, and every import reports a
//! canonical content digest.

pub mod digest;
pub mod format;
pub mod importer;
pub mod parser;

pub use digest::compute_seed_digest;
pub use format::{SeedFile, SeedLink, SeedRow, SEED_SCHEMA_VERSION};
pub use importer::{import_seed, SeedImportSummary};
pub use parser::{parse_seed_file, parse_seed_str};
