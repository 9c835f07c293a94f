//! When steps for storage seeding BDD scenarios.

use super::world::StorageWorld;
use rstest_bdd_macros::when;
use storage_database::storage::domain::TableDefinition;

#[when("the definition is applied")]
fn definition_applied(world: &mut StorageWorld) -> Result<(), eyre::Report> {
    let definition = world.definition()?.clone();
    world.apply(&definition)
}

#[when("the definition is applied with forced insert")]
fn definition_applied_forced(world: &mut StorageWorld) -> Result<(), eyre::Report> {
    let definition = world.definition()?.clone().force_insert(true);
    world.apply(&definition)
}

#[when(r#"the "{table}" table is dropped"#)]
fn table_dropped(world: &mut StorageWorld, table: String) -> Result<(), eyre::Report> {
    let definition = TableDefinition::new(table)
        .map_err(|err| eyre::eyre!("invalid table name in scenario: {err}"))?
        .drop_table();
    world.apply(&definition)
}
