//! Schema application for storage databases.
//!
//! Provides [`StorageSchemaProcessor`], which applies a
//! [`TableDefinition`] to a database wrapping a storage connection. Storage
//! engines with native record operations are handled directly; SQL-backed
//! storage is handed to a [`RelationalMigrator`].

use crate::database::{Database, PgDatabase};
use crate::storage::{
    adapters::postgres::PostgresTableMigrator,
    domain::{ApplyStrategy, Item, TableDefinition},
    ports::{MigrationError, RecordStore, RelationalMigrator, Storage, StorageError, StorageResult},
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Underlying cause of a failed apply step.
#[derive(Debug, Clone, Error)]
pub enum ApplyFailure {
    /// The storage connection failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The relational migrator failed.
    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// Errors returned by [`StorageSchemaProcessor::process`].
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    /// The database does not wrap a storage engine this processor can apply
    /// definitions to.
    #[error("unsupported storage database '{database}'")]
    UnsupportedBackend {
        /// Database name.
        database: String,
    },

    /// Creating, seeding, or dropping the table failed. Transactional
    /// attempts are rolled back before this error is returned.
    #[error("failed to apply table '{table}': {source}")]
    Apply {
        /// Table name.
        table: String,
        /// Original failure.
        source: ApplyFailure,
    },
}

impl ProcessError {
    fn unsupported(database: &dyn Database) -> Self {
        warn!(database = database.name(), "unsupported storage database");
        Self::UnsupportedBackend {
            database: database.name().to_owned(),
        }
    }

    fn apply(table: &TableDefinition, cause: impl Into<ApplyFailure>) -> Self {
        let source = cause.into();
        warn!(table = %table.name(), error = %source, "failed to apply table");
        Self::Apply {
            table: table.name().to_owned(),
            source,
        }
    }
}

/// Result type for schema processing.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Applies table definitions to storage databases.
///
/// The processor is stateless apart from its relational migrator, so one
/// instance may serve concurrent calls against different databases.
#[derive(Debug, Clone, Default)]
pub struct StorageSchemaProcessor<M = PostgresTableMigrator> {
    migrator: M,
}

impl StorageSchemaProcessor {
    /// Creates a processor using [`PostgresTableMigrator`] for SQL storage.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            migrator: PostgresTableMigrator::new(),
        }
    }
}

impl<M> StorageSchemaProcessor<M>
where
    M: RelationalMigrator,
{
    /// Creates a processor delegating SQL storage to `migrator`.
    #[must_use]
    pub const fn with_migrator(migrator: M) -> Self {
        Self { migrator }
    }

    /// Returns whether `database` wraps a storage engine this processor can
    /// apply definitions to.
    #[must_use]
    pub fn supports_database(&self, database: &dyn Database) -> bool {
        database.as_storage().is_some_and(|storage| {
            !matches!(storage.backend().apply_strategy(), ApplyStrategy::Unsupported)
        })
    }

    /// Applies `table` to `database`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::UnsupportedBackend`] when the database is not
    /// supported, or [`ProcessError::Apply`] when the storage or the
    /// relational migrator fails.
    pub fn process(&self, table: &TableDefinition, database: &dyn Database) -> ProcessResult<()> {
        let Some(storage) = database.as_storage() else {
            return Err(ProcessError::unsupported(database));
        };

        match storage.backend().apply_strategy() {
            ApplyStrategy::Unsupported => Err(ProcessError::unsupported(database)),
            ApplyStrategy::Relational(pool) => {
                debug!(
                    table = %table.name(),
                    database = database.name(),
                    "delegating table to relational migrator"
                );
                let sql_database = PgDatabase::new(pool, database.name());
                self.migrator
                    .process(table, &sql_database)
                    .map_err(|err| ProcessError::apply(table, err))
            }
            ApplyStrategy::Direct => apply_direct(table, storage.as_ref()),
        }
    }
}

fn apply_direct(table: &TableDefinition, storage: &dyn Storage) -> ProcessResult<()> {
    if table.is_dropping() {
        return drop_collection(table, storage);
    }

    let Some(items) = table.get_items() else {
        debug!(table = %table.name(), "no items to seed");
        return Ok(());
    };

    if !table.forcing_insert() {
        let stored = storage
            .count(table.name())
            .map_err(|err| ProcessError::apply(table, err))?;
        if stored > 0 {
            debug!(table = %table.name(), stored, "collection already seeded, skipping items");
            return Ok(());
        }
    }

    let result = if table.with_transaction() {
        storage.transaction(&mut |store: &dyn RecordStore| seed_collection(table, items, store))
    } else {
        seed_collection(table, items, storage)
    };
    result.map_err(|err| ProcessError::apply(table, err))?;

    info!(
        table = %table.name(),
        count = items.len(),
        forced = table.forcing_insert(),
        "seeded storage collection"
    );
    Ok(())
}

fn drop_collection(table: &TableDefinition, storage: &dyn Storage) -> ProcessResult<()> {
    let result = if table.with_transaction() {
        storage.transaction(&mut |store: &dyn RecordStore| store.delete_table(table.name()))
    } else {
        storage.delete_table(table.name())
    };
    result.map_err(|err| ProcessError::apply(table, err))?;

    info!(table = %table.name(), "dropped storage collection");
    Ok(())
}

fn seed_collection<S>(table: &TableDefinition, items: &[Item], store: &S) -> StorageResult<()>
where
    S: RecordStore + ?Sized,
{
    if table.forcing_insert() {
        let merged = merge_with_stored(table.name(), items, store)?;
        return store.store_items(table.name(), merged);
    }

    store.store_items(table.name(), items.to_vec())
}

/// Stored records followed by `items`, without deduplication.
fn merge_with_stored<S>(table: &str, items: &[Item], store: &S) -> StorageResult<Vec<Item>>
where
    S: RecordStore + ?Sized,
{
    let mut merged = store.fetch_items(table)?;
    merged.extend_from_slice(items);
    Ok(merged)
}
