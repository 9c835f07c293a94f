//! Adapter exposing a storage connection as a named database.

use crate::database::Database;
use crate::storage::ports::Storage;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Name used when none is configured.
pub const DEFAULT_DATABASE_NAME: &str = "storage";

/// A storage connection registered under a database name.
///
/// The adapter owns its storage for its whole lifetime and carries no named
/// parameters.
#[derive(Clone)]
pub struct StorageDatabase {
    storage: Arc<dyn Storage>,
    name: String,
}

impl StorageDatabase {
    /// Wraps `storage` under `name`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, name: impl Into<String>) -> Self {
        Self {
            storage,
            name: name.into(),
        }
    }

    /// Wraps `storage` under [`DEFAULT_DATABASE_NAME`].
    #[must_use]
    pub fn unnamed(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, DEFAULT_DATABASE_NAME)
    }

    /// Returns the storage connection.
    #[must_use]
    pub const fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

impl fmt::Debug for StorageDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageDatabase")
            .field("name", &self.name)
            .field("backend", &self.storage.backend().as_str())
            .finish()
    }
}

impl Database for StorageDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn connection(&self) -> &(dyn Any + Send + Sync) {
        &self.storage
    }

    fn parameter(&self, _name: &str, default: Value) -> Value {
        default
    }

    fn as_storage(&self) -> Option<&Arc<dyn Storage>> {
        Some(&self.storage)
    }
}
