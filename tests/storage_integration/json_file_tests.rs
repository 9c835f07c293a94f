//! Persistence tests for JSON-file storage databases.

use crate::storage_integration::helpers::{
    TestResult, factory, processor, stored_names, users_table,
};
use camino::Utf8PathBuf;
use rstest::rstest;
use storage_database::storage::services::{
    StorageDatabaseConfig, StorageDatabaseFactory, StorageSchemaProcessor,
};

/// Seeded records survive rebuilding the database from the same config.
#[rstest]
fn seeded_records_survive_reopen(
    factory: StorageDatabaseFactory,
    processor: StorageSchemaProcessor,
) -> TestResult {
    let temp = tempfile::tempdir()?;
    let dir = Utf8PathBuf::from_path_buf(temp.path().join("storage"))
        .map_err(|path| format!("non UTF-8 temp path: {}", path.display()))?;
    let config = StorageDatabaseConfig::new("json_file")
        .with_dir(dir.clone())
        .with_tables(["users".to_owned()]);

    let database = factory.create_database("files", &config)?;
    processor.process(&users_table(&["John", "Mia"])?, &database)?;
    assert!(dir.join("users.json").is_file());

    let reopened = factory.create_database("files", &config)?;
    assert_eq!(stored_names(&reopened, "users")?, ["John", "Mia"]);

    processor.process(&users_table(&["Tom"])?, &reopened)?;
    assert_eq!(reopened.storage().count("users")?, 2);
    Ok(())
}

/// Dropping removes the collection file.
#[rstest]
fn drop_removes_file(
    factory: StorageDatabaseFactory,
    processor: StorageSchemaProcessor,
) -> TestResult {
    let temp = tempfile::tempdir()?;
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
        .map_err(|path| format!("non UTF-8 temp path: {}", path.display()))?;
    let config = StorageDatabaseConfig::new("json_file")
        .with_dir(dir.clone())
        .with_tables(["users".to_owned()]);
    let database = factory.create_database("files", &config)?;

    processor.process(&users_table(&["John"])?, &database)?;
    processor.process(&users_table(&[])?.drop_table(), &database)?;

    assert!(!dir.join("users.json").exists());
    Ok(())
}
