//! Error types for cache operations.

use std::path::PathBuf;

use ccx_engine::EngineError;

/// Errors that can occur while fetching a translation unit.
///
/// After an error the cache holds no entry for the file, so the next request
/// starts with a fresh parse.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A fresh parse failed.
    #[error("parse of {path} failed: {source}")]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The engine's error.
        source: EngineError,
    },

    /// An incremental reparse of a cached unit failed; the unit was evicted.
    #[error("reparse of {path} failed: {source}")]
    Reparse {
        /// The file being reparsed.
        path: PathBuf,
        /// The engine's error.
        source: EngineError,
    },
}
