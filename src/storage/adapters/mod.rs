//! Adapter implementations for the storage ports and the database contract.

pub mod database;
pub mod json_file;
pub mod memory;
pub mod postgres;

mod staging;
