//! Product domain: value objects, records and write validation.

pub mod product;
pub mod types;
