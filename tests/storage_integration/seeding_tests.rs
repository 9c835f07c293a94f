//! Seeding tests for storage databases built by the factory.

use crate::storage_integration::helpers::{
    TestResult, factory, processor, stored_names, user, users_table,
};
use rstest::rstest;
use storage_database::database::Database;
use storage_database::storage::{
    domain::TableDefinition,
    services::{StorageDatabaseConfig, StorageDatabaseFactory, StorageSchemaProcessor},
};

fn in_memory_config() -> StorageDatabaseConfig {
    StorageDatabaseConfig::new("in_memory").with_tables(["users".to_owned()])
}

/// Seeds once, skips a repeat, and appends on a forced run.
#[rstest]
fn seed_skip_and_force(
    factory: StorageDatabaseFactory,
    processor: StorageSchemaProcessor,
) -> TestResult {
    let database = factory.create_database("storage", &in_memory_config())?;
    assert!(processor.supports_database(&database));

    let seed = users_table(&["John", "Mia"])?;
    processor.process(&seed, &database)?;
    assert_eq!(database.storage().count("users")?, 2);

    processor.process(&seed, &database)?;
    assert_eq!(database.storage().count("users")?, 2);

    processor.process(&seed.force_insert(true), &database)?;
    assert_eq!(
        stored_names(&database, "users")?,
        ["John", "Mia", "John", "Mia"]
    );
    Ok(())
}

/// Seeding without a transaction produces the same result.
#[rstest]
fn seed_without_transaction(
    factory: StorageDatabaseFactory,
    processor: StorageSchemaProcessor,
) -> TestResult {
    let database = factory.create_database("storage", &in_memory_config())?;

    processor.process(&users_table(&["John"])?.use_transaction(false), &database)?;

    assert_eq!(stored_names(&database, "users")?, ["John"]);
    Ok(())
}

/// Independent databases never share collections.
#[rstest]
fn databases_are_isolated(
    factory: StorageDatabaseFactory,
    processor: StorageSchemaProcessor,
) -> TestResult {
    let first = factory.create_database("first", &in_memory_config())?;
    let second = factory.create_database("second", &in_memory_config())?;

    processor.process(&users_table(&["John"])?, &first)?;

    assert_eq!(first.name(), "first");
    assert_eq!(first.storage().count("users")?, 1);
    assert_eq!(second.storage().count("users")?, 0);
    Ok(())
}

/// A definition may seed a collection without declaring columns.
#[rstest]
fn schemaless_seed(
    factory: StorageDatabaseFactory,
    processor: StorageSchemaProcessor,
) -> TestResult {
    let config = StorageDatabaseConfig::new("in_memory").with_tables(["events".to_owned()]);
    let database = factory.create_database("storage", &config)?;
    let events = TableDefinition::new("events")?.items([user("signup"), user("login")]);

    processor.process(&events, &database)?;

    assert_eq!(stored_names(&database, "events")?, ["signup", "login"]);
    Ok(())
}
