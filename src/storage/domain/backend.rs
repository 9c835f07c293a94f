//! Backend identification and the schema strategy each backend takes.

use crate::database::PgPool;
use std::fmt;

/// Identifies the engine behind a storage connection.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// [`crate::storage::adapters::memory::InMemoryStorage`].
    InMemory,
    /// [`crate::storage::adapters::json_file::JsonFileStorage`].
    JsonFile,
    /// [`crate::storage::adapters::postgres::PostgresStorage`], carrying its
    /// pool so relational migrations run against the same database.
    Postgres(PgPool),
    /// A storage engine implemented outside this crate.
    External(String),
}

/// How a table definition is applied to a backend.
#[derive(Debug, Clone)]
pub enum ApplyStrategy {
    /// Apply through the storage's own record operations.
    Direct,
    /// Hand the definition to the relational migrator over this pool.
    Relational(PgPool),
    /// The backend cannot take table definitions.
    Unsupported,
}

impl StorageBackend {
    /// Resolves the strategy used to apply table definitions.
    #[must_use]
    pub fn apply_strategy(&self) -> ApplyStrategy {
        match self {
            Self::InMemory | Self::JsonFile => ApplyStrategy::Direct,
            Self::Postgres(pool) => ApplyStrategy::Relational(pool.clone()),
            Self::External(_) => ApplyStrategy::Unsupported,
        }
    }

    /// Returns the backend identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InMemory => "in_memory",
            Self::JsonFile => "json_file",
            Self::Postgres(_) => "postgres",
            Self::External(name) => name,
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
