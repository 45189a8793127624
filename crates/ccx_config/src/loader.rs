//! Configuration file discovery, loading and validation.

use crate::error::ConfigError;
use crate::types::CcxConfig;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in project directories.
pub const CONFIG_FILE: &str = "ccx.toml";

/// Loads and validates `<dir>/ccx.toml`.
pub fn load_config(dir: &Path) -> Result<CcxConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<CcxConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content).map_err(|e| match e {
        ConfigError::Parse { reason } => ConfigError::Parse {
            reason: format!("{}: {reason}", path.display()),
        },
        other => other,
    })
}

/// Parses and validates a `ccx.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CcxConfig, ConfigError> {
    let config: CcxConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Walks up from `start` looking for the nearest `ccx.toml`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads the nearest `ccx.toml` above `start`, or the defaults if there is none.
///
/// A file that exists but fails to parse or validate is an error; only a
/// missing file falls back to defaults.
pub fn discover_config(start: &Path) -> Result<CcxConfig, ConfigError> {
    match find_config_file(start) {
        Some(path) => load_config_file(&path),
        None => Ok(CcxConfig::default()),
    }
}

/// Validates that file-name lists are usable for upward searches.
fn validate_config(config: &CcxConfig) -> Result<(), ConfigError> {
    let lists = [
        ("flags.database_paths", &config.flags.database_paths),
        ("flags.args_file_paths", &config.flags.args_file_paths),
    ];
    for (field, names) in lists {
        for name in names {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "empty name".to_string(),
                });
            }
            if Path::new(name).is_absolute() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("'{name}' must be relative to the searched directory"),
                });
            }
        }
    }
    Ok(())
}
