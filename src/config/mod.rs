//! Configuration module for styleform
//!
//! Provides types and parsing for `styleform.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
