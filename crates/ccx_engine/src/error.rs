//! Error types for engine calls.

use std::path::PathBuf;

/// Errors reported by an [`AnalysisEngine`](crate::AnalysisEngine) or one of
/// its translation units.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine could not create a translation unit.
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// An incremental reparse failed; the unit should be discarded.
    #[error("failed to reparse {path}: {reason}")]
    Reparse {
        /// The file of the unit.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A completion or cursor query failed.
    #[error("query at {path}:{line}:{column} failed: {reason}")]
    Query {
        /// The file queried.
        path: PathBuf,
        /// The 1-based line.
        line: u32,
        /// The 1-based byte column.
        column: u32,
        /// Description of the failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = EngineError::Parse {
            path: PathBuf::from("/p/a.c"),
            reason: "AST read error".to_string(),
        };
        assert_eq!(err.to_string(), "failed to parse /p/a.c: AST read error");
    }

    #[test]
    fn query_error_display() {
        let err = EngineError::Query {
            path: PathBuf::from("/p/a.c"),
            line: 3,
            column: 7,
            reason: "invalid location".to_string(),
        };
        assert_eq!(err.to_string(), "query at /p/a.c:3:7 failed: invalid location");
    }
}
