//! Record storage engines exposed as databases, and schema application.
//!
//! A storage engine keeps ordered records in named collections. This module
//! wraps such engines behind the generic [`crate::database::Database`]
//! contract and applies [`domain::TableDefinition`]s to them. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
