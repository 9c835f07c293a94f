//! Shared test helpers for storage database integration tests.

use rstest::fixture;
use storage_database::database::Databases;
use storage_database::storage::{
    adapters::database::StorageDatabase,
    domain::{Item, ItemValue, TableDefinition, TableDomainError},
    ports::StorageError,
    services::{StorageDatabaseFactory, StorageSchemaProcessor},
};

/// Result type shared by integration tests.
pub type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Provides a processor using the default relational migrator.
#[fixture]
pub fn processor() -> StorageSchemaProcessor {
    StorageSchemaProcessor::new()
}

/// Provides a factory with an empty database registry.
#[fixture]
pub fn factory() -> StorageDatabaseFactory {
    StorageDatabaseFactory::new(Databases::new())
}

/// Builds a user record.
#[must_use]
pub fn user(name: &str) -> Item {
    Item::from([("name".to_owned(), ItemValue::from(name))])
}

/// Builds the `users` definition seeded with the given names.
///
/// # Errors
///
/// Returns an error if the definition is rejected.
pub fn users_table(names: &[&str]) -> Result<TableDefinition, TableDomainError> {
    Ok(TableDefinition::new("users")?
        .primary("id")?
        .string("name")?
        .items(names.iter().map(|name| user(name))))
}

/// Reads the `name` column of every stored record in `table`.
///
/// # Errors
///
/// Returns an error if the collection cannot be read.
pub fn stored_names(database: &StorageDatabase, table: &str) -> Result<Vec<String>, StorageError> {
    let items = database.storage().fetch_items(table)?;
    Ok(items
        .iter()
        .filter_map(|item| item.get("name").and_then(ItemValue::as_text))
        .map(str::to_owned)
        .collect())
}
