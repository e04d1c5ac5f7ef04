//! Parsing and validation of `gatelift.toml` configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`Config`] whose `[elaborate]` section controls how the elaborator picks
//! the top entity, names constant drivers, and treats unresolved aliases.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
