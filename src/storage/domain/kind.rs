//! Storage kind identifiers used in configuration.

use super::ParseStorageKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage engine kinds the database factory can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Process-local storage with no persistence.
    InMemory,
    /// One JSON document per collection inside a directory.
    JsonFile,
    /// Tables in a `PostgreSQL` database registered elsewhere.
    Postgres,
}

impl StorageKind {
    /// Returns the canonical configuration identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InMemory => "in_memory",
            Self::JsonFile => "json_file",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for StorageKind {
    type Error = ParseStorageKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "in_memory" => Ok(Self::InMemory),
            "json_file" => Ok(Self::JsonFile),
            "postgres" => Ok(Self::Postgres),
            _ => Err(ParseStorageKindError(value.to_owned())),
        }
    }
}
