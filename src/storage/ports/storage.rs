//! Storage connection port.

use crate::storage::domain::{Item, StorageBackend};
use std::sync::Arc;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Record-level operations on named collections.
///
/// Transaction bodies receive a `&dyn RecordStore` bound to the open
/// transaction, so this trait carries no thread-safety bounds.
pub trait RecordStore {
    /// Counts the records in a collection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnknownTable`] when the collection does not
    /// exist.
    fn count(&self, table: &str) -> StorageResult<usize>;

    /// Returns every record of a collection in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnknownTable`] when the collection does not
    /// exist.
    fn fetch_items(&self, table: &str) -> StorageResult<Vec<Item>>;

    /// Replaces the records of a collection with `items`.
    ///
    /// Engines without a schema catalog create the collection when it does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the engine rejects the write.
    fn store_items(&self, table: &str, items: Vec<Item>) -> StorageResult<()>;

    /// Deletes a collection and all of its records.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnknownTable`] when the collection does not
    /// exist.
    fn delete_table(&self, table: &str) -> StorageResult<()>;
}

/// Body of a storage transaction.
pub type UnitOfWork<'a> = dyn FnMut(&dyn RecordStore) -> StorageResult<()> + 'a;

/// A storage connection: record operations plus a transaction boundary.
pub trait Storage: RecordStore + Send + Sync {
    /// Identifies the engine behind this connection.
    fn backend(&self) -> StorageBackend;

    /// Runs `work` inside a transaction.
    ///
    /// Changes made through the store handed to `work` are committed when it
    /// returns `Ok` and discarded when it returns `Err`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a [`StorageError`] when the
    /// transaction cannot be opened or committed.
    fn transaction(&self, work: &mut UnitOfWork<'_>) -> StorageResult<()>;
}

/// Errors returned by storage adapters.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The collection does not exist.
    #[error("unknown storage table: {0}")]
    UnknownTable(String),

    /// The collection name cannot be used by this engine.
    #[error("invalid storage table name '{0}'")]
    InvalidTableName(String),

    /// Records could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(Arc<dyn std::error::Error + Send + Sync>),

    /// Filesystem failure.
    #[error("storage io error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),

    /// Database driver or pool failure.
    #[error("storage database error: {0}")]
    Database(Arc<dyn std::error::Error + Send + Sync>),

    /// A lock guarding in-process state was poisoned.
    #[error("storage state lock poisoned: {0}")]
    Poisoned(String),
}

impl StorageError {
    /// Wraps an encoding or decoding failure.
    pub fn serialization(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Serialization(Arc::new(err))
    }

    /// Wraps a filesystem failure.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }

    /// Wraps a database driver or pool failure.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Arc::new(err))
    }
}

impl From<diesel::result::Error> for StorageError {
    fn from(err: diesel::result::Error) -> Self {
        Self::database(err)
    }
}
