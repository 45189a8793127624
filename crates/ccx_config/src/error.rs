//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Errors raised while loading a `ccx.toml`.
///
/// A missing file is not among them when discovering: [`discover_config`]
/// falls back to defaults. An explicitly named file that cannot be read is.
///
/// [`discover_config`]: crate::discover_config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The content is not valid TOML for a ccx configuration.
    #[error("invalid configuration: {reason}")]
    Parse {
        /// Parser message, prefixed with the file when loaded from disk.
        reason: String,
    },

    /// A field parsed but holds a value ccx cannot use.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted field name, e.g. `flags.database_paths`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
