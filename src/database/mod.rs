//! Generic named-database contract shared by every database kind.
//!
//! A multi-database host hands out [`Database`] trait objects and resolves
//! them by name through a [`Databases`] registry. Concrete kinds expose extra
//! capabilities through the optional accessors on [`Database`].

mod contract;
mod pg;
mod registry;

pub use contract::Database;
pub use pg::{PgDatabase, PgPool};
pub use registry::{DatabaseRegistryError, Databases};
