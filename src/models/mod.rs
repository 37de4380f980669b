//! Diesel row types and runtime configuration.

#[cfg(feature = "cli")]
pub mod config;
pub mod product;
