//! Core utilities for the artifact deploy tools
//!
//! This crate provides the functionality shared by the platform crates:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with per-field defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use deploy_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("log level: {}", config.schema.logging.level);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};
