use thiserror::Error;

/// Result type alias using ShelfError
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Canonical error taxonomy for Shelflink operations
///
/// Each variant carries the identifiers needed for programmatic handling and
/// maps to a stable error code via [`ShelfError::code`]. Codes are part of the
/// external API surface (HTTP bodies, CLI output) and must not change.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShelfError {
    // ===== Storage Errors =====
    /// Backing store failed or was unreachable; `op` names the failing operation
    #[error("Storage unavailable during {op}: {message}")]
    StorageUnavailable { op: String, message: String },

    // ===== Relationship Errors =====
    /// The (owner, target) pair already exists for this relation kind
    #[error("Duplicate {relation} link: owner {owner_id} is already linked to target {target_id}")]
    DuplicateLink {
        relation: String,
        owner_id: i64,
        target_id: i64,
    },

    /// Relation kind is not registered in the relation registry
    #[error("Unknown relation kind: {kind}")]
    UnknownRelationKind { kind: String },

    /// An owner or target id does not resolve to an existing entity row
    #[error("Unknown {entity} reference: {id}")]
    UnknownReference { entity: String, id: i64 },

    /// A reconciliation failed partway; `removed`/`added` hold the changes
    /// that were already applied when the underlying error struck
    #[error("Reconciliation of {relation} for owner {owner_id} was interrupted (applied removed={removed:?}, added={added:?})")]
    ReconcileInterrupted {
        relation: String,
        owner_id: i64,
        added: Vec<i64>,
        removed: Vec<i64>,
        source: Box<ShelfError>,
    },

    // ===== CRUD Errors =====
    /// Entity or link row not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: i64 },

    /// Validation failure on caller-supplied input
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    // ===== Seed Errors =====
    /// Seed file failed parsing or referential validation
    #[error("Invalid seed: {message}")]
    SeedInvalid { message: String },
}

impl ShelfError {
    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ShelfError::StorageUnavailable { .. } => "ERR_STORAGE_UNAVAILABLE",
            ShelfError::DuplicateLink { .. } => "ERR_DUPLICATE_LINK",
            ShelfError::UnknownRelationKind { .. } => "ERR_UNKNOWN_RELATION_KIND",
            ShelfError::UnknownReference { .. } => "ERR_UNKNOWN_REFERENCE",
            ShelfError::ReconcileInterrupted { .. } => "ERR_RECONCILE_INTERRUPTED",
            ShelfError::NotFound { .. } => "ERR_NOT_FOUND",
            ShelfError::InvalidInput { .. } => "ERR_INVALID_INPUT",
            ShelfError::SeedInvalid { .. } => "ERR_SEED_INVALID",
        }
    }

    /// Shorthand for an invalid-input error with a formatted message
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ShelfError::InvalidInput {
            message: message.into(),
        }
    }

    /// Shorthand for a not-found error
    pub fn not_found(entity: impl Into<String>, id: i64) -> Self {
        ShelfError::NotFound {
            entity: entity.into(),
            id,
        }
    }
}
