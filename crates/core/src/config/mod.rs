//! Configuration loading and schema definitions
//!
//! Shared configuration types used across the deploy crates.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
