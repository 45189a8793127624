//! Error types for flag extraction.

use std::path::PathBuf;

/// Errors raised while reading a build-configuration source.
///
/// None of these escape [`resolve`](crate::resolve): each one is logged and
/// the next source is tried, so a broken compilation database degrades to
/// "no flags found" instead of breaking completion.
#[derive(Debug, thiserror::Error)]
pub enum FlagsError {
    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A compilation database is not a JSON array of records.
    #[error("invalid compilation database {path}: {reason}")]
    Json {
        /// The database file.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A command line could not be split into shell words.
    #[error("unbalanced quoting in command: {command}")]
    ShellSplit {
        /// The offending command line.
        command: String,
    },

    /// A compilation-database record has neither `command` nor `arguments`.
    #[error("record for {file} has no command or arguments")]
    MissingCommand {
        /// The `file` field of the record.
        file: String,
    },

    /// No record of a compilation database could be turned into arguments.
    #[error("no usable record in {path}")]
    NoUsableRecord {
        /// The database file.
        path: PathBuf,
    },
}
