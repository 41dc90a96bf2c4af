//! Parsing and validation of `weft.toml` router configuration files.
//!
//! This crate reads the router configuration file and produces a
//! strongly-typed [`WeftConfig`] holding search budgets, cost tuning knobs,
//! and clock-routing settings. Every field has a default, so an empty file
//! (or no file at all) yields the stock router behavior.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::*;
