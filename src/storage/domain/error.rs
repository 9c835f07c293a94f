//! Error types for storage domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing table definitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableDomainError {
    /// The table name is empty after trimming.
    #[error("table name must not be empty")]
    EmptyTableName,

    /// A column name is empty after trimming.
    #[error("column name must not be empty in table '{0}'")]
    EmptyColumnName(String),

    /// A column with the same name was already added to the table.
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn {
        /// Table name.
        table: String,
        /// Duplicated column name.
        column: String,
    },
}

/// Error returned while parsing a storage kind identifier from configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown storage kind: {0}")]
pub struct ParseStorageKindError(pub String);
