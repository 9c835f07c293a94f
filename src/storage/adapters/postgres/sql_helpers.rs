//! SQL rendering and execution helpers shared by the `PostgreSQL` adapters.
//!
//! Table and column names are always double-quoted; record values travel as a
//! single `JSONB` parameter expanded with `jsonb_populate_recordset`.

use crate::storage::domain::{ColumnDefinition, ColumnType, Item, TableDefinition};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Jsonb};
use std::collections::BTreeSet;

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName)]
struct ItemRow {
    #[diesel(sql_type = Jsonb)]
    item: serde_json::Value,
}

/// Quotes an SQL identifier.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn count_sql(table: &str) -> String {
    format!("SELECT COUNT(*) AS count FROM {}", quote_identifier(table))
}

pub(crate) fn fetch_sql(table: &str) -> String {
    format!(
        "SELECT row_to_json(t)::jsonb AS item FROM {} AS t",
        quote_identifier(table)
    )
}

pub(crate) fn delete_rows_sql(table: &str) -> String {
    format!("DELETE FROM {}", quote_identifier(table))
}

pub(crate) fn drop_table_sql(table: &str, if_exists: bool) -> String {
    let guard = if if_exists { "IF EXISTS " } else { "" };
    format!("DROP TABLE {guard}{}", quote_identifier(table))
}

/// Returns the union of column names used by `items`, sorted.
pub(crate) fn item_columns(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Renders the insert for a `JSONB` array bound as `$1`.
///
/// Only the listed columns are written so that omitted ones keep their
/// defaults, including generated primary keys.
pub(crate) fn insert_items_sql(table: &str, columns: &[String]) -> String {
    let table_name = quote_identifier(table);
    if columns.is_empty() {
        return format!("INSERT INTO {table_name} DEFAULT VALUES");
    }

    let column_list = columns
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table_name} ({column_list}) SELECT {column_list} \
         FROM jsonb_populate_recordset(NULL::{table_name}, $1)"
    )
}

/// Renders `CREATE TABLE IF NOT EXISTS`, or `None` for a definition without
/// columns.
pub(crate) fn create_table_sql(table: &TableDefinition) -> Option<String> {
    if table.columns().is_empty() {
        return None;
    }

    let columns = table
        .columns()
        .iter()
        .map(column_sql)
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "CREATE TABLE IF NOT EXISTS {} ({columns})",
        quote_identifier(table.name())
    ))
}

fn column_sql(column: &ColumnDefinition) -> String {
    let name = quote_identifier(column.name());
    let sql_type = match column.column_type() {
        ColumnType::Primary => return format!("{name} BIGSERIAL PRIMARY KEY"),
        ColumnType::Integer => "INTEGER".to_owned(),
        ColumnType::BigInteger => "BIGINT".to_owned(),
        ColumnType::Boolean => "BOOLEAN".to_owned(),
        ColumnType::Float => "DOUBLE PRECISION".to_owned(),
        ColumnType::String { length } => format!("VARCHAR({length})"),
        ColumnType::Text => "TEXT".to_owned(),
        ColumnType::Json => "JSONB".to_owned(),
    };
    let null_constraint = if column.is_nullable() { "NULL" } else { "NOT NULL" };
    format!("{name} {sql_type} {null_constraint}")
}

pub(super) fn count_rows(conn: &mut PgConnection, table: &str) -> QueryResult<i64> {
    let row = diesel::sql_query(count_sql(table)).get_result::<CountRow>(conn)?;
    Ok(row.count)
}

pub(super) fn load_rows(
    conn: &mut PgConnection,
    table: &str,
) -> QueryResult<Vec<serde_json::Value>> {
    let rows = diesel::sql_query(fetch_sql(table)).load::<ItemRow>(conn)?;
    Ok(rows.into_iter().map(|row| row.item).collect())
}

pub(super) fn delete_rows(conn: &mut PgConnection, table: &str) -> QueryResult<()> {
    diesel::sql_query(delete_rows_sql(table)).execute(conn)?;
    Ok(())
}

pub(super) fn drop_table(
    conn: &mut PgConnection,
    table: &str,
    if_exists: bool,
) -> QueryResult<()> {
    diesel::sql_query(drop_table_sql(table, if_exists)).execute(conn)?;
    Ok(())
}

/// Appends `items` to `table`.
pub(super) fn insert_items(
    conn: &mut PgConnection,
    table: &str,
    items: &[Item],
) -> QueryResult<()> {
    if items.is_empty() {
        return Ok(());
    }

    let columns = item_columns(items);
    let sql = insert_items_sql(table, &columns);
    if columns.is_empty() {
        for _ in items {
            diesel::sql_query(&sql).execute(conn)?;
        }
        return Ok(());
    }

    let payload = serde_json::to_value(items)
        .map_err(|err| diesel::result::Error::SerializationError(Box::new(err)))?;
    diesel::sql_query(sql)
        .bind::<Jsonb, _>(payload)
        .execute(conn)?;
    Ok(())
}
