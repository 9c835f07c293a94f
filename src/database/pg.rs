//! SQL-capable database backed by a `PostgreSQL` connection pool.

use super::Database;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// `PostgreSQL` connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// A named `PostgreSQL` database.
#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
    name: String,
    parameters: BTreeMap<String, Value>,
}

impl PgDatabase {
    /// Creates a database over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool, name: impl Into<String>) -> Self {
        Self {
            pool,
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Sets a named parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl fmt::Debug for PgDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgDatabase")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl Database for PgDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn connection(&self) -> &(dyn Any + Send + Sync) {
        &self.pool
    }

    fn parameter(&self, name: &str, default: Value) -> Value {
        self.parameters.get(name).cloned().unwrap_or(default)
    }

    fn as_pg(&self) -> Option<&PgDatabase> {
        Some(self)
    }
}
