//! Name-keyed registry of databases.

use super::Database;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Errors returned by [`Databases`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatabaseRegistryError {
    /// A database with the same name is already registered.
    #[error("duplicate database name: {0}")]
    DuplicateDatabase(String),
}

/// Thread-safe registry of named databases.
///
/// Clones share the same entries, so a factory can hold a handle while the
/// host keeps registering databases.
#[derive(Clone, Default)]
pub struct Databases {
    entries: Arc<RwLock<HashMap<String, Arc<dyn Database>>>>,
}

impl Databases {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a database under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseRegistryError::DuplicateDatabase`] when the name is
    /// already taken.
    pub fn add(&self, database: Arc<dyn Database>) -> Result<(), DatabaseRegistryError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let name = database.name().to_owned();
        if entries.contains_key(&name) {
            return Err(DatabaseRegistryError::DuplicateDatabase(name));
        }
        entries.insert(name, database);
        Ok(())
    }

    /// Returns the database registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Database>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(name).cloned()
    }

    /// Returns whether a database is registered under `name`.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(name)
    }

    /// Returns the registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = entries.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Databases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Databases")
            .field("names", &self.names())
            .finish()
    }
}
