//! Relational migration port.

use crate::database::PgDatabase;
use crate::storage::domain::TableDefinition;
use std::sync::Arc;
use thiserror::Error;

/// Result type for relational migrations.
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Applies table definitions to a SQL database as DDL and DML.
#[cfg_attr(test, mockall::automock)]
pub trait RelationalMigrator: Send + Sync {
    /// Creates and seeds, or drops, the table described by `table`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError`] when the definition cannot be rendered or
    /// the database rejects a statement.
    fn process(&self, table: &TableDefinition, database: &PgDatabase) -> MigrationResult<()>;
}

/// Errors returned by relational migrators.
#[derive(Debug, Clone, Error)]
pub enum MigrationError {
    /// The definition cannot be expressed for this database.
    #[error("invalid definition for table '{table}': {reason}")]
    InvalidDefinition {
        /// Table name.
        table: String,
        /// Reason string.
        reason: String,
    },

    /// Database driver or pool failure.
    #[error("migration database error: {0}")]
    Database(Arc<dyn std::error::Error + Send + Sync>),
}

impl MigrationError {
    /// Wraps a database driver or pool failure.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Arc::new(err))
    }
}

impl From<diesel::result::Error> for MigrationError {
    fn from(err: diesel::result::Error) -> Self {
        Self::database(err)
    }
}
