//! Then steps for storage seeding BDD scenarios.

use super::world::{StorageWorld, split_names};
use eyre::eyre;
use rstest_bdd_macros::then;
use storage_database::storage::{
    domain::ItemValue,
    ports::StorageError,
    services::ProcessError,
};

fn last_apply_succeeded(world: &StorageWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Ok(())) => Ok(()),
        Some(Err(err)) => Err(eyre!("last apply failed: {err}")),
        None => Err(eyre!("no definition was applied")),
    }
}

#[then(r#"the "{table}" collection holds {count:usize} records"#)]
fn collection_holds(
    world: &StorageWorld,
    table: String,
    count: usize,
) -> Result<(), eyre::Report> {
    last_apply_succeeded(world)?;
    let stored = world.storage()?.count(&table)?;
    if stored != count {
        return Err(eyre!("expected {count} records in {table}, found {stored}"));
    }
    Ok(())
}

#[then(r#"the "{table}" collection lists "{names}""#)]
fn collection_lists(world: &StorageWorld, table: String, names: String) -> Result<(), eyre::Report> {
    let items = world.storage()?.fetch_items(&table)?;
    let stored: Vec<&str> = items
        .iter()
        .filter_map(|item| item.get("name").and_then(ItemValue::as_text))
        .collect();
    let expected = split_names(&names);
    if stored != expected {
        return Err(eyre!("expected {expected:?} in {table}, found {stored:?}"));
    }
    Ok(())
}

#[then(r#"the "{table}" collection is unknown"#)]
fn collection_unknown(world: &StorageWorld, table: String) -> Result<(), eyre::Report> {
    last_apply_succeeded(world)?;
    match world.storage()?.count(&table) {
        Err(StorageError::UnknownTable(_)) => Ok(()),
        other => Err(eyre!("expected {table} to be unknown, got {other:?}")),
    }
}

#[then("applying fails as unsupported")]
fn applying_fails_unsupported(world: &StorageWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre!("missing apply result"))?;

    if !matches!(result, Err(ProcessError::UnsupportedBackend { .. })) {
        return Err(eyre!("expected unsupported backend error, got {result:?}"));
    }
    Ok(())
}
