//! Persistence layer for product records.
//!
//! The crate exposes the product domain types with their write validation,
//! the Diesel/SQLite schema and row models, connection pooling with embedded
//! migrations, and the repository traits with their Diesel implementation.

pub mod db;
pub mod domain;
pub mod models;
pub mod repository;
pub mod schema;
