//! `PostgreSQL` adapters: record storage over tables and the relational
//! migrator used for schema application.

mod migrator;
mod sql_helpers;
mod storage;

pub use migrator::PostgresTableMigrator;
pub use storage::PostgresStorage;

#[cfg(test)]
pub(crate) use sql_helpers::{
    count_sql, create_table_sql, drop_table_sql, fetch_sql, insert_items_sql, item_columns,
    quote_identifier,
};
