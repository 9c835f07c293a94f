//! The named-database contract.

use super::PgDatabase;
use crate::storage::ports::Storage;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// A named database connection as seen by the multi-database host.
///
/// Implementations carry no mutable state beyond construction. Capability
/// accessors default to `None`; a kind overrides the one it supports.
pub trait Database: Send + Sync {
    /// Returns the configured database name.
    fn name(&self) -> &str;

    /// Returns the underlying connection as an opaque handle.
    fn connection(&self) -> &(dyn Any + Send + Sync);

    /// Returns the value of a named parameter, or `default` when unset.
    fn parameter(&self, name: &str, default: Value) -> Value;

    /// Returns the storage connection when this database wraps one.
    fn as_storage(&self) -> Option<&Arc<dyn Storage>> {
        None
    }

    /// Returns the SQL connection when this database is `PostgreSQL`-backed.
    fn as_pg(&self) -> Option<&PgDatabase> {
        None
    }
}
