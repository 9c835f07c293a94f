//! Buffered writes for engines without native transactions.
//!
//! A [`StagedRecordStore`] reads through to its base store and records every
//! write as the final state of the touched collection. Committing hands the
//! recorded states back to the engine; dropping the stage discards them.

use crate::storage::{
    domain::Item,
    ports::{RecordStore, StorageError, StorageResult},
};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Final state of a collection touched inside a transaction.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum StagedChange {
    /// The collection holds exactly these records.
    Store(Vec<Item>),
    /// The collection was deleted.
    Delete,
}

/// Write buffer layered over a base store.
pub(super) struct StagedRecordStore<'a> {
    base: &'a dyn RecordStore,
    changes: RefCell<BTreeMap<String, StagedChange>>,
}

impl<'a> StagedRecordStore<'a> {
    pub(super) fn new(base: &'a dyn RecordStore) -> Self {
        Self {
            base,
            changes: RefCell::new(BTreeMap::new()),
        }
    }

    /// Consumes the stage and returns the recorded changes by table name.
    pub(super) fn into_changes(self) -> BTreeMap<String, StagedChange> {
        self.changes.into_inner()
    }
}

impl RecordStore for StagedRecordStore<'_> {
    fn count(&self, table: &str) -> StorageResult<usize> {
        match self.changes.borrow().get(table) {
            Some(StagedChange::Store(items)) => Ok(items.len()),
            Some(StagedChange::Delete) => Err(StorageError::UnknownTable(table.to_owned())),
            None => self.base.count(table),
        }
    }

    fn fetch_items(&self, table: &str) -> StorageResult<Vec<Item>> {
        match self.changes.borrow().get(table) {
            Some(StagedChange::Store(items)) => Ok(items.clone()),
            Some(StagedChange::Delete) => Err(StorageError::UnknownTable(table.to_owned())),
            None => self.base.fetch_items(table),
        }
    }

    fn store_items(&self, table: &str, items: Vec<Item>) -> StorageResult<()> {
        self.changes
            .borrow_mut()
            .insert(table.to_owned(), StagedChange::Store(items));
        Ok(())
    }

    fn delete_table(&self, table: &str) -> StorageResult<()> {
        // Deleting must fail for unknown collections exactly as the base would.
        self.count(table)?;
        self.changes
            .borrow_mut()
            .insert(table.to_owned(), StagedChange::Delete);
        Ok(())
    }
}
