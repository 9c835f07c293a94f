//! Factory building storage databases from configuration records.

use crate::database::Databases;
use crate::storage::{
    adapters::{
        database::StorageDatabase, json_file::JsonFileStorage, memory::InMemoryStorage,
        postgres::PostgresStorage,
    },
    domain::StorageKind,
    ports::Storage,
};
use camino::Utf8PathBuf;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Configuration record for one storage database.
///
/// Every key is optional at the type level so the factory can report exactly
/// which one is missing. Deserialises from records such as
/// `{"storage": "json_file", "dir": "/var/lib/app/storage"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageDatabaseConfig {
    /// Storage kind identifier, see [`StorageKind`].
    pub storage: Option<String>,
    /// Directory for `json_file` storage.
    pub dir: Option<Utf8PathBuf>,
    /// Name of the registered SQL database used by `postgres` storage.
    pub database: Option<String>,
    /// Collections declared up front for `in_memory` and `json_file` storage.
    pub tables: Vec<String>,
}

impl StorageDatabaseConfig {
    /// Creates a config selecting the given storage kind.
    #[must_use]
    pub fn new(storage: impl Into<String>) -> Self {
        Self {
            storage: Some(storage.into()),
            ..Self::default()
        }
    }

    /// Sets the storage directory.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Sets the referenced SQL database name.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the declared collections.
    #[must_use]
    pub fn with_tables(mut self, tables: impl IntoIterator<Item = String>) -> Self {
        self.tables = tables.into_iter().collect();
        self
    }
}

/// Reasons a storage database config is rejected.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationErrorKind {
    /// No `storage` key.
    #[error("missing \"storage\" config")]
    MissingStorage,

    /// `json_file` storage without a `dir` key.
    #[error("missing \"dir\" config")]
    MissingDirectory,

    /// `postgres` storage without a `database` key.
    #[error("missing \"database\" config")]
    MissingDatabaseReference,

    /// The referenced database is unknown or not SQL-capable.
    #[error("storage \"database\" config '{0}' needs to be a postgres database")]
    NotSqlDatabase(String),

    /// The `storage` key names no known storage kind.
    #[error("could not create storage database for storage '{0}'")]
    UnknownStorage(String),

    /// The storage directory could not be opened.
    #[error("could not open storage directory: {0}")]
    Io(Arc<std::io::Error>),
}

/// Error returned when a storage database cannot be built from its config.
#[derive(Debug, Clone, Error)]
#[error("invalid config for database '{database}': {kind}")]
pub struct ConfigurationError {
    database: String,
    kind: ConfigurationErrorKind,
}

impl ConfigurationError {
    fn new(database: &str, kind: ConfigurationErrorKind) -> Self {
        warn!(database, reason = %kind, "rejected storage database config");
        Self {
            database: database.to_owned(),
            kind,
        }
    }

    /// Returns the name of the database being built.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the rejection reason.
    #[must_use]
    pub const fn kind(&self) -> &ConfigurationErrorKind {
        &self.kind
    }
}

/// Builds [`StorageDatabase`]s, resolving SQL references through a registry.
#[derive(Debug, Clone)]
pub struct StorageDatabaseFactory {
    databases: Databases,
}

impl StorageDatabaseFactory {
    /// Creates a factory resolving references against `databases`.
    #[must_use]
    pub const fn new(databases: Databases) -> Self {
        Self { databases }
    }

    /// Builds the storage database `name` from `config`.
    ///
    /// `json_file` storage creates its directory when missing. `postgres`
    /// storage shares the pool of the referenced database.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when a required key is missing, the
    /// storage kind is unknown, the referenced database is not SQL-capable,
    /// or the storage directory cannot be opened.
    pub fn create_database(
        &self,
        name: &str,
        config: &StorageDatabaseConfig,
    ) -> Result<StorageDatabase, ConfigurationError> {
        let Some(identifier) = config.storage.as_deref() else {
            return Err(ConfigurationError::new(
                name,
                ConfigurationErrorKind::MissingStorage,
            ));
        };

        let kind = StorageKind::try_from(identifier).map_err(|err| {
            ConfigurationError::new(name, ConfigurationErrorKind::UnknownStorage(err.0))
        })?;

        let storage: Arc<dyn Storage> = match kind {
            StorageKind::InMemory => {
                Arc::new(InMemoryStorage::new().with_tables(config.tables.iter().cloned()))
            }
            StorageKind::JsonFile => Arc::new(Self::json_file_storage(name, config)?),
            StorageKind::Postgres => Arc::new(self.postgres_storage(name, config)?),
        };

        info!(database = name, storage = %kind, "created storage database");
        Ok(StorageDatabase::new(storage, name))
    }

    fn json_file_storage(
        name: &str,
        config: &StorageDatabaseConfig,
    ) -> Result<JsonFileStorage, ConfigurationError> {
        let dir = config.dir.as_deref().ok_or_else(|| {
            ConfigurationError::new(name, ConfigurationErrorKind::MissingDirectory)
        })?;

        let storage = JsonFileStorage::open(dir).map_err(|err| {
            ConfigurationError::new(name, ConfigurationErrorKind::Io(Arc::new(err)))
        })?;
        Ok(storage.with_tables(config.tables.iter().cloned()))
    }

    fn postgres_storage(
        &self,
        name: &str,
        config: &StorageDatabaseConfig,
    ) -> Result<PostgresStorage, ConfigurationError> {
        let reference = config.database.as_deref().ok_or_else(|| {
            ConfigurationError::new(name, ConfigurationErrorKind::MissingDatabaseReference)
        })?;

        let referenced = self.databases.get(reference);
        let pool = referenced
            .as_deref()
            .and_then(|database| database.as_pg())
            .map(|database| database.pool().clone())
            .ok_or_else(|| {
                ConfigurationError::new(
                    name,
                    ConfigurationErrorKind::NotSqlDatabase(reference.to_owned()),
                )
            })?;
        Ok(PostgresStorage::new(pool))
    }
}
