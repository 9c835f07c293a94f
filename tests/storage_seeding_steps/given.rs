//! Given steps for storage seeding BDD scenarios.

use std::sync::Arc;

use super::world::{StorageWorld, split_names};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use storage_database::{
    database::PgDatabase,
    storage::{
        domain::{Item, ItemValue, TableDefinition},
        services::StorageDatabaseConfig,
    },
};

#[given(r#"an in-memory storage database with table "{table}""#)]
fn in_memory_database(world: &mut StorageWorld, table: String) -> Result<(), eyre::Report> {
    let config = StorageDatabaseConfig::new("in_memory").with_tables([table]);
    let database = world
        .factory
        .create_database("storage", &config)
        .wrap_err("create in-memory storage database")?;
    world.database = Some(Arc::new(database));
    Ok(())
}

#[given(r#"a plain SQL database named "{name}""#)]
fn plain_sql_database(world: &mut StorageWorld, name: String) {
    let pool = Pool::builder()
        .min_idle(Some(0))
        .build_unchecked(ConnectionManager::<PgConnection>::new("postgres://localhost/unused"));
    world.database = Some(Arc::new(PgDatabase::new(pool, name)));
}

#[given(r#"a "{table}" definition seeding "{names}""#)]
fn seeding_definition(
    world: &mut StorageWorld,
    table: String,
    names: String,
) -> Result<(), eyre::Report> {
    let items = split_names(&names)
        .into_iter()
        .map(|name| Item::from([("name".to_owned(), ItemValue::from(name))]));
    let definition = TableDefinition::new(table)
        .and_then(|definition| definition.primary("id"))
        .and_then(|definition| definition.string("name"))
        .wrap_err("build seeding definition")?
        .items(items);
    world.definition = Some(definition);
    Ok(())
}
