//! Port contracts for storage connections and relational migrations.

mod migrator;
mod storage;

#[cfg(test)]
pub use migrator::MockRelationalMigrator;
pub use migrator::{MigrationError, MigrationResult, RelationalMigrator};
pub use storage::{RecordStore, Storage, StorageError, StorageResult, UnitOfWork};
