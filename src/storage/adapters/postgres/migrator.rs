//! Relational migrator for `PostgreSQL` databases.

use super::sql_helpers::{count_rows, create_table_sql, drop_table, insert_items, item_columns};
use crate::database::PgDatabase;
use crate::storage::{
    domain::{Item, TableDefinition},
    ports::{MigrationError, MigrationResult, RelationalMigrator},
};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use tracing::{debug, info};

/// Applies table definitions as `PostgreSQL` DDL and inserts.
///
/// Drops use `DROP TABLE IF EXISTS`. Creation uses
/// `CREATE TABLE IF NOT EXISTS` when the definition declares columns. Seed
/// items are appended with plain inserts, skipped when the table already has
/// rows unless the definition forces the insert. Items naming columns the
/// definition does not declare are rejected before a connection is taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresTableMigrator;

impl PostgresTableMigrator {
    /// Creates the migrator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RelationalMigrator for PostgresTableMigrator {
    fn process(&self, table: &TableDefinition, database: &PgDatabase) -> MigrationResult<()> {
        let seed = table.get_items().filter(|_| !table.is_dropping());
        if let Some(items) = seed {
            check_item_columns(table, items)?;
        }

        let mut connection = database.pool().get().map_err(MigrationError::database)?;
        let conn: &mut PgConnection = &mut connection;

        if table.with_transaction() {
            conn.transaction::<_, MigrationError, _>(|tx| apply_table(tx, table))
        } else {
            apply_table(conn, table)
        }
    }
}

fn apply_table(conn: &mut PgConnection, table: &TableDefinition) -> MigrationResult<()> {
    if table.is_dropping() {
        drop_table(conn, table.name(), true)?;
        info!(table = %table.name(), "dropped postgres table");
        return Ok(());
    }

    if let Some(ddl) = create_table_sql(table) {
        conn.batch_execute(&ddl)?;
        debug!(table = %table.name(), "ensured postgres table exists");
    }

    let Some(items) = table.get_items() else {
        return Ok(());
    };

    if !table.forcing_insert() && count_rows(conn, table.name())? > 0 {
        debug!(table = %table.name(), "postgres table already seeded, skipping items");
        return Ok(());
    }

    insert_items(conn, table.name(), items)?;
    info!(table = %table.name(), count = items.len(), "seeded postgres table");
    Ok(())
}

/// Rejects seed items that use columns the definition does not declare.
fn check_item_columns(table: &TableDefinition, items: &[Item]) -> MigrationResult<()> {
    if table.columns().is_empty() {
        return Ok(());
    }

    let undeclared = item_columns(items)
        .into_iter()
        .find(|name| !table.columns().iter().any(|column| column.name() == name));

    match undeclared {
        Some(name) => Err(MigrationError::InvalidDefinition {
            table: table.name().to_owned(),
            reason: format!("item column '{name}' is not declared"),
        }),
        None => Ok(()),
    }
}
