//! Error handling for shelflink-store
//!
//! Maps rusqlite failures into the shelflink-core taxonomy.

use shelflink_core::errors::ShelfError;

pub use shelflink_core::errors::Result;

/// Create a storage error from a rusqlite error, naming the failing operation
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> ShelfError {
    ShelfError::StorageUnavailable {
        op: op.to_string(),
        message: err.to_string(),
    }
}

/// True when the error is a UNIQUE or PRIMARY KEY constraint violation
///
/// Used to turn junction-table conflicts into `DuplicateLink` instead of a
/// generic storage error.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// True when the error is a FOREIGN KEY constraint violation
pub fn is_fk_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// Create a seed validation error
pub fn seed_invalid(reason: impl Into<String>) -> ShelfError {
    ShelfError::SeedInvalid {
        message: reason.into(),
    }
}
