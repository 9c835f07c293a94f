//! Drop tests for storage databases built by the factory.

use crate::storage_integration::helpers::{TestResult, factory, processor, users_table};
use rstest::rstest;
use storage_database::storage::{
    ports::StorageError,
    services::{
        ApplyFailure, ProcessError, StorageDatabaseConfig, StorageDatabaseFactory,
        StorageSchemaProcessor,
    },
};

/// Dropping a seeded collection makes it unknown.
#[rstest]
fn drop_seeded_collection(
    factory: StorageDatabaseFactory,
    processor: StorageSchemaProcessor,
) -> TestResult {
    let config = StorageDatabaseConfig::new("in_memory").with_tables(["users".to_owned()]);
    let database = factory.create_database("storage", &config)?;
    processor.process(&users_table(&["John", "Mia"])?, &database)?;

    processor.process(&users_table(&[])?.drop_table(), &database)?;

    assert!(matches!(
        database.storage().count("users"),
        Err(StorageError::UnknownTable(_))
    ));
    Ok(())
}

/// Dropping a collection twice fails the second time.
#[rstest]
fn drop_twice_fails(
    factory: StorageDatabaseFactory,
    processor: StorageSchemaProcessor,
) -> TestResult {
    let config = StorageDatabaseConfig::new("in_memory").with_tables(["users".to_owned()]);
    let database = factory.create_database("storage", &config)?;
    let drop = users_table(&[])?.drop_table();

    processor.process(&drop, &database)?;
    let second = processor.process(&drop, &database);

    assert!(matches!(
        second,
        Err(ProcessError::Apply {
            source: ApplyFailure::Storage(StorageError::UnknownTable(_)),
            ..
        })
    ));
    Ok(())
}
