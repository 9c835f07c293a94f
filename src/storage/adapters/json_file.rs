//! JSON-file storage engine.
//!
//! Each collection lives in `<dir>/<table>.json` as a JSON array of flat
//! objects. Writes go to a hidden temporary file that is then renamed over
//! the collection file, so readers never observe a half-written document.

use super::staging::{StagedChange, StagedRecordStore};
use crate::storage::{
    domain::{Item, StorageBackend},
    ports::{RecordStore, Storage, StorageError, StorageResult, UnitOfWork},
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::collections::BTreeSet;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::debug;

/// Storage backed by one JSON document per collection.
///
/// Collections known to the catalog but without a file yet count as empty.
/// Clones share the directory handle and the catalog. They also share a
/// writer lock that serialises writes and transactions; handles opened
/// separately on the same directory do not.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: Arc<Dir>,
    path: Utf8PathBuf,
    declared: Arc<RwLock<BTreeSet<String>>>,
    writer: Arc<Mutex<()>>,
}

impl JsonFileStorage {
    /// Opens the storage directory, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(path: impl AsRef<Utf8Path>) -> io::Result<Self> {
        let dir_path = path.as_ref();
        Dir::create_ambient_dir_all(dir_path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(dir_path, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            path: dir_path.to_owned(),
            declared: Arc::new(RwLock::new(BTreeSet::new())),
            writer: Arc::new(Mutex::new(())),
        })
    }

    /// Declares a collection that counts as empty until first stored.
    #[must_use]
    pub fn with_table(self, table: impl Into<String>) -> Self {
        self.declared
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table.into());
        self
    }

    /// Declares several collections.
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

    /// Returns the storage directory path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn lock_writer(&self) -> StorageResult<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|err| StorageError::Poisoned(err.to_string()))
    }

    fn is_declared(&self, table: &str) -> StorageResult<bool> {
        let declared = self
            .declared
            .read()
            .map_err(|err| StorageError::Poisoned(err.to_string()))?;
        Ok(declared.contains(table))
    }

    fn set_declared(&self, table: &str, declared: bool) -> StorageResult<()> {
        let mut catalog = self
            .declared
            .write()
            .map_err(|err| StorageError::Poisoned(err.to_string()))?;
        if declared {
            catalog.insert(table.to_owned());
        } else {
            catalog.remove(table);
        }
        Ok(())
    }

    fn read_table(&self, table: &str) -> StorageResult<Vec<Item>> {
        let file = table_file(table)?;
        if self.dir.exists(&file) {
            let contents = self.dir.read_to_string(&file).map_err(StorageError::io)?;
            return serde_json::from_str(&contents).map_err(StorageError::serialization);
        }

        if self.is_declared(table)? {
            return Ok(Vec::new());
        }

        Err(StorageError::UnknownTable(table.to_owned()))
    }

    fn write_table(&self, table: &str, items: &[Item]) -> StorageResult<()> {
        let file = table_file(table)?;
        let temporary = format!(".{file}.tmp");
        let contents = serde_json::to_vec_pretty(items).map_err(StorageError::serialization)?;
        self.dir
            .write(&temporary, contents)
            .map_err(StorageError::io)?;
        self.dir
            .rename(&temporary, &self.dir, &file)
            .map_err(StorageError::io)?;
        self.set_declared(table, true)
    }

    fn remove_table(&self, table: &str) -> StorageResult<()> {
        let file = table_file(table)?;
        let exists = self.dir.exists(&file);
        if !exists && !self.is_declared(table)? {
            return Err(StorageError::UnknownTable(table.to_owned()));
        }

        if exists {
            self.dir.remove_file(&file).map_err(StorageError::io)?;
        }
        self.set_declared(table, false)
    }
}

impl RecordStore for JsonFileStorage {
    fn count(&self, table: &str) -> StorageResult<usize> {
        self.read_table(table).map(|items| items.len())
    }

    fn fetch_items(&self, table: &str) -> StorageResult<Vec<Item>> {
        self.read_table(table)
    }

    fn store_items(&self, table: &str, items: Vec<Item>) -> StorageResult<()> {
        let _writer = self.lock_writer()?;
        self.write_table(table, &items)
    }

    fn delete_table(&self, table: &str) -> StorageResult<()> {
        let _writer = self.lock_writer()?;
        self.remove_table(table)
    }
}

impl Storage for JsonFileStorage {
    fn backend(&self) -> StorageBackend {
        StorageBackend::JsonFile
    }

    /// Buffers writes in memory and flushes them file by file on success.
    ///
    /// The writer lock is held from the first read of `work` until the last
    /// flush. A failure while flushing can leave earlier collections written;
    /// the engine offers no durability beyond per-file atomic renames.
    fn transaction(&self, work: &mut UnitOfWork<'_>) -> StorageResult<()> {
        let _writer = self.lock_writer()?;
        let staged = StagedRecordStore::new(self);
        if let Err(err) = work(&staged) {
            debug!(error = %err, dir = %self.path, "rolling back json file transaction");
            return Err(err);
        }

        for (table, change) in staged.into_changes() {
            match change {
                StagedChange::Store(items) => self.write_table(&table, &items)?,
                StagedChange::Delete => self.remove_table(&table)?,
            }
        }
        Ok(())
    }
}

/// Maps a collection name to its file name.
fn table_file(table: &str) -> StorageResult<String> {
    let is_valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if !is_valid {
        return Err(StorageError::InvalidTableName(table.to_owned()));
    }

    Ok(format!("{table}.json"))
}
