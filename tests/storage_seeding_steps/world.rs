//! Shared world state for storage seeding BDD scenarios.

use std::sync::Arc;

use eyre::eyre;
use rstest::fixture;
use storage_database::{
    database::{Database, Databases},
    storage::{
        domain::TableDefinition,
        ports::Storage,
        services::{ProcessResult, StorageDatabaseFactory, StorageSchemaProcessor},
    },
};

/// Scenario world for storage seeding behaviour tests.
pub struct StorageWorld {
    pub processor: StorageSchemaProcessor,
    pub factory: StorageDatabaseFactory,
    pub database: Option<Arc<dyn Database>>,
    pub definition: Option<TableDefinition>,
    pub last_result: Option<ProcessResult<()>>,
}

impl StorageWorld {
    /// Creates a world with no database selected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            processor: StorageSchemaProcessor::new(),
            factory: StorageDatabaseFactory::new(Databases::new()),
            database: None,
            definition: None,
            last_result: None,
        }
    }

    /// Returns the database under test.
    pub fn database(&self) -> Result<&Arc<dyn Database>, eyre::Report> {
        self.database
            .as_ref()
            .ok_or_else(|| eyre!("missing database in scenario world"))
    }

    /// Returns the storage of the database under test.
    pub fn storage(&self) -> Result<&Arc<dyn Storage>, eyre::Report> {
        self.database()?
            .as_storage()
            .ok_or_else(|| eyre!("scenario database has no storage"))
    }

    /// Returns the pending table definition.
    pub fn definition(&self) -> Result<&TableDefinition, eyre::Report> {
        self.definition
            .as_ref()
            .ok_or_else(|| eyre!("missing table definition in scenario world"))
    }

    /// Applies `definition` to the database under test and records the result.
    pub fn apply(&mut self, definition: &TableDefinition) -> Result<(), eyre::Report> {
        let result = self.processor.process(definition, self.database()?.as_ref());
        self.last_result = Some(result);
        Ok(())
    }
}

impl Default for StorageWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> StorageWorld {
    StorageWorld::default()
}

/// Splits a comma-separated step argument into names.
pub fn split_names(names: &str) -> Vec<&str> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
