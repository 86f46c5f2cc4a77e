//! Schema and synthetic data seeder for a construction-materials store.
//!
//! The data model and generators live in [`loja_data_gen`]; this crate
//! persists them in DuckDB and drives seeding runs.

// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod config;
pub mod seed;
pub mod store;
pub mod verify;

mod progress;
