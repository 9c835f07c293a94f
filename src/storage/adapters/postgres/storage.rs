//! `PostgreSQL` storage over plain tables.

use super::sql_helpers::{count_rows, delete_rows, drop_table, insert_items, load_rows};
use crate::database::PgPool;
use crate::storage::{
    domain::{Item, StorageBackend},
    ports::{RecordStore, Storage, StorageError, StorageResult, UnitOfWork},
};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use std::cell::RefCell;
use std::fmt;

/// Storage whose collections are `PostgreSQL` tables.
///
/// Tables must already exist; schema changes go through
/// [`super::PostgresTableMigrator`].
#[derive(Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Creates storage over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn with_connection<T>(
        &self,
        operation: impl FnOnce(&mut PgConnection) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut connection = self.pool.get().map_err(StorageError::database)?;
        operation(&mut connection)
    }
}

impl fmt::Debug for PostgresStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("pool", &self.pool)
            .finish()
    }
}

impl RecordStore for PostgresStorage {
    fn count(&self, table: &str) -> StorageResult<usize> {
        self.with_connection(|conn| count_items(conn, table))
    }

    fn fetch_items(&self, table: &str) -> StorageResult<Vec<Item>> {
        self.with_connection(|conn| fetch_items(conn, table))
    }

    fn store_items(&self, table: &str, items: Vec<Item>) -> StorageResult<()> {
        // Replacing rows must not expose an empty table to other sessions.
        self.with_connection(|conn| {
            conn.transaction::<_, StorageError, _>(|tx| replace_items(tx, table, &items))
        })
    }

    fn delete_table(&self, table: &str) -> StorageResult<()> {
        self.with_connection(|conn| Ok(drop_table(conn, table, false)?))
    }
}

impl Storage for PostgresStorage {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Postgres(self.pool.clone())
    }

    fn transaction(&self, work: &mut UnitOfWork<'_>) -> StorageResult<()> {
        self.with_connection(|conn| {
            conn.transaction::<_, StorageError, _>(|tx| {
                let store = TransactionRecordStore::new(tx);
                work(&store)
            })
        })
    }
}

/// Record store bound to one open transaction connection.
struct TransactionRecordStore<'c> {
    conn: RefCell<&'c mut PgConnection>,
}

impl<'c> TransactionRecordStore<'c> {
    const fn new(conn: &'c mut PgConnection) -> Self {
        Self {
            conn: RefCell::new(conn),
        }
    }
}

impl RecordStore for TransactionRecordStore<'_> {
    fn count(&self, table: &str) -> StorageResult<usize> {
        count_items(&mut self.conn.borrow_mut(), table)
    }

    fn fetch_items(&self, table: &str) -> StorageResult<Vec<Item>> {
        fetch_items(&mut self.conn.borrow_mut(), table)
    }

    fn store_items(&self, table: &str, items: Vec<Item>) -> StorageResult<()> {
        replace_items(&mut self.conn.borrow_mut(), table, &items)
    }

    fn delete_table(&self, table: &str) -> StorageResult<()> {
        Ok(drop_table(&mut self.conn.borrow_mut(), table, false)?)
    }
}

fn count_items(conn: &mut PgConnection, table: &str) -> StorageResult<usize> {
    let count = count_rows(conn, table)?;
    usize::try_from(count).map_err(StorageError::database)
}

fn fetch_items(conn: &mut PgConnection, table: &str) -> StorageResult<Vec<Item>> {
    load_rows(conn, table)?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(StorageError::serialization))
        .collect()
}

fn replace_items(conn: &mut PgConnection, table: &str, items: &[Item]) -> StorageResult<()> {
    delete_rows(conn, table)?;
    insert_items(conn, table, items)?;
    Ok(())
}
