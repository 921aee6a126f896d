//! Configuration for the `xwalk` binary
//!
//! Provides types, discovery and parsing for `crosswalk.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
