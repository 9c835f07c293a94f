//! Domain model for storage collections and schema definitions.
//!
//! Items are plain column-to-scalar maps. A [`TableDefinition`] describes one
//! schema unit to apply: its columns, an optional seed payload, and whether it
//! creates or drops the collection.

mod backend;
mod error;
mod item;
mod kind;
mod table;

pub use backend::{ApplyStrategy, StorageBackend};
pub use error::{ParseStorageKindError, TableDomainError};
pub use item::{Item, ItemValue};
pub use kind::StorageKind;
pub use table::{ColumnDefinition, ColumnType, TableDefinition};
