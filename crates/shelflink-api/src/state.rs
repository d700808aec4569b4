//! Shared application state

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use shelflink_core::registry::RelationRegistry;
use shelflink_store::RelationStore;

/// Shared application dependencies.
///
/// One SQLite connection serves the whole process, behind a mutex. Handlers
/// acquire it for their synchronous statement block only.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    relations: RelationStore,
}

impl AppState {
    pub fn new(conn: Connection, registry: RelationRegistry) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            relations: RelationStore::new(Arc::new(registry)),
        }
    }

    /// Acquire the connection lock with poison recovery.
    ///
    /// A handler that panicked while holding the lock poisons it; the data
    /// is a plain connection handle, so the next caller takes it back.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        match self.db.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("connection mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    pub fn relations(&self) -> &RelationStore {
        &self.relations
    }

    pub fn registry(&self) -> &RelationRegistry {
        self.relations.registry()
    }
}
