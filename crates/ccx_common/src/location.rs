//! Source locations returned by navigation queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A `{file, line, column}` position in a source file.
///
/// Lines and columns are 1-based; the column is a byte column, matching what
/// the analysis engine reports.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Location {
    /// The file containing the position.
    pub file: PathBuf,
    /// The 1-based line number.
    #[serde(rename = "lnum")]
    pub line: u32,
    /// The 1-based byte column.
    #[serde(rename = "bcol")]
    pub column: u32,
}

impl Location {
    /// Creates a new location.
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}
