//! Services that build storage databases and apply table definitions.

mod factory;
mod processor;

pub use factory::{
    ConfigurationError, ConfigurationErrorKind, StorageDatabaseConfig, StorageDatabaseFactory,
};
pub use processor::{ApplyFailure, ProcessError, ProcessResult, StorageSchemaProcessor};
