//! Storage databases: key/record storage engines behind a generic
//! multi-database contract.
//!
//! This crate lets a multi-backend database layer treat a simple record
//! storage engine (JSON files, in-memory maps, or `PostgreSQL`) as one of its
//! named database connections, and lets a schema pipeline create, seed, and
//! drop tables on that storage uniformly.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Table definitions, items, and backend kinds
//! - **Ports**: Abstract trait interfaces for storage and relational migration
//! - **Adapters**: Concrete storage engines and the database adapter
//! - **Services**: The database factory and the schema processor
//!
//! # Modules
//!
//! - [`database`]: Generic named-database contract and registry
//! - [`storage`]: Storage engines and schema application

pub mod database;
pub mod storage;
