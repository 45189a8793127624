//! Parsing and validation of `ccx.toml` configuration files.
//!
//! This crate reads the optional project configuration file and produces a
//! strongly-typed [`CcxConfig`]: which compilation-database and flags-file
//! names the flag extractor looks for, how completion candidates are matched,
//! and where the analysis engine lives. Every field has a default, so a
//! missing file is equivalent to an empty one.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    discover_config, find_config_file, load_config, load_config_file, load_config_from_str,
    CONFIG_FILE,
};
pub use types::*;
