//! Step definitions for storage seeding scenarios.

pub mod world;

mod given;
mod then;
mod when;
