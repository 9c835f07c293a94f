//! In-memory storage engine.

use super::staging::{StagedChange, StagedRecordStore};
use crate::storage::{
    domain::{Item, StorageBackend},
    ports::{RecordStore, Storage, StorageError, StorageResult, UnitOfWork},
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

type Collections = HashMap<String, Vec<Item>>;

/// Thread-safe, process-local storage.
///
/// Clones share the same collections. Transactions buffer their writes and
/// apply them on success, holding the write lock for their whole duration.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<RwLock<Collections>>,
}

impl InMemoryStorage {
    /// Creates storage with no collections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an empty collection, keeping existing records if present.
    #[must_use]
    pub fn with_table(self, table: impl Into<String>) -> Self {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(table.into())
            .or_default();
        self
    }

    /// Declares several empty collections.
    #[must_use]
    pub fn with_tables<I, S>(self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tables
            .into_iter()
            .fold(self, |storage, table| storage.with_table(table))
    }

    /// Seeds a collection with records, replacing existing ones.
    #[must_use]
    pub fn with_items(self, table: impl Into<String>, items: Vec<Item>) -> Self {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table.into(), items);
        self
    }

    fn read_state(&self) -> StorageResult<RwLockReadGuard<'_, Collections>> {
        self.state
            .read()
            .map_err(|err| StorageError::Poisoned(err.to_string()))
    }

    fn write_state(&self) -> StorageResult<RwLockWriteGuard<'_, Collections>> {
        self.state
            .write()
            .map_err(|err| StorageError::Poisoned(err.to_string()))
    }
}

impl RecordStore for InMemoryStorage {
    fn count(&self, table: &str) -> StorageResult<usize> {
        count_in(&*self.read_state()?, table)
    }

    fn fetch_items(&self, table: &str) -> StorageResult<Vec<Item>> {
        fetch_in(&*self.read_state()?, table)
    }

    fn store_items(&self, table: &str, items: Vec<Item>) -> StorageResult<()> {
        self.write_state()?.insert(table.to_owned(), items);
        Ok(())
    }

    fn delete_table(&self, table: &str) -> StorageResult<()> {
        delete_in(&mut *self.write_state()?, table)
    }
}

impl Storage for InMemoryStorage {
    fn backend(&self) -> StorageBackend {
        StorageBackend::InMemory
    }

    /// Holds the write lock from the first read of `work` until commit, so
    /// concurrent transactions on clones run one after another.
    ///
    /// `work` must go through the store it is given. Calling back into this
    /// storage from inside `work` deadlocks.
    fn transaction(&self, work: &mut UnitOfWork<'_>) -> StorageResult<()> {
        let mut state = self.write_state()?;
        let locked = LockedCollections {
            state: RefCell::new(&mut *state),
        };
        let staged = StagedRecordStore::new(&locked);
        if let Err(err) = work(&staged) {
            debug!(error = %err, "rolling back in-memory transaction");
            return Err(err);
        }

        for (table, change) in staged.into_changes() {
            match change {
                StagedChange::Store(items) => locked.store_items(&table, items)?,
                StagedChange::Delete => locked.delete_table(&table)?,
            }
        }
        Ok(())
    }
}

/// Collections borrowed from a held write guard.
struct LockedCollections<'a> {
    state: RefCell<&'a mut Collections>,
}

impl RecordStore for LockedCollections<'_> {
    fn count(&self, table: &str) -> StorageResult<usize> {
        count_in(&self.state.borrow(), table)
    }

    fn fetch_items(&self, table: &str) -> StorageResult<Vec<Item>> {
        fetch_in(&self.state.borrow(), table)
    }

    fn store_items(&self, table: &str, items: Vec<Item>) -> StorageResult<()> {
        self.state.borrow_mut().insert(table.to_owned(), items);
        Ok(())
    }

    fn delete_table(&self, table: &str) -> StorageResult<()> {
        delete_in(&mut self.state.borrow_mut(), table)
    }
}

fn count_in(state: &Collections, table: &str) -> StorageResult<usize> {
    state
        .get(table)
        .map(Vec::len)
        .ok_or_else(|| StorageError::UnknownTable(table.to_owned()))
}

fn fetch_in(state: &Collections, table: &str) -> StorageResult<Vec<Item>> {
    state
        .get(table)
        .cloned()
        .ok_or_else(|| StorageError::UnknownTable(table.to_owned()))
}

fn delete_in(state: &mut Collections, table: &str) -> StorageResult<()> {
    state
        .remove(table)
        .map(drop)
        .ok_or_else(|| StorageError::UnknownTable(table.to_owned()))
}
