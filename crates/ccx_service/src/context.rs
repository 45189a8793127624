//! Per-request buffer context supplied by the editor.

use std::fmt;
use std::path::PathBuf;

use ccx_common::RevisionToken;
use ccx_config::MatcherSpec;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// The language a buffer position is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// C.
    C,
    /// C++.
    Cpp,
}

impl Language {
    /// Returns the engine flag that forces this language.
    pub fn flag(self) -> &'static str {
        match self {
            Language::C => "-xc",
            Language::Cpp => "-xc++",
        }
    }

    /// Returns the file extension used for embedded-language buffers.
    pub fn extension(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }

    /// Maps an editor filetype name; anything but `cpp` is treated as C.
    pub fn from_filetype(filetype: &str) -> Self {
        if filetype == "cpp" {
            Language::Cpp
        } else {
            Language::C
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::C => write!(f, "c"),
            Language::Cpp => write!(f, "cpp"),
        }
    }
}

/// What the editor knows about the buffer at the time of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferContext {
    /// The buffer's file.
    pub filepath: PathBuf,
    /// The editor's working directory.
    pub cwd: PathBuf,
    /// The buffer's filetype (`c`, `cpp`, `markdown`).
    pub filetype: String,
    /// The language at the cursor; differs from `filetype` inside embedded
    /// code blocks.
    pub scope: String,
    /// 1-based cursor line.
    #[serde(rename = "lnum")]
    pub line: u32,
    /// 1-based cursor byte column.
    #[serde(rename = "bcol")]
    pub byte_column: u32,
    /// 1-based column where the completed word starts.
    #[serde(rename = "startccol")]
    pub start_column: u32,
    /// Text typed between `start_column` and the cursor.
    #[serde(default)]
    pub base: String,
    /// The buffer's change counter.
    pub changedtick: RevisionToken,
    /// The matcher the editor selected, if any.
    #[serde(default)]
    pub matcher: Option<MatcherSpec>,
}

impl BufferContext {
    /// Returns the language the request is parsed as.
    ///
    /// A `cpp` scope or a `cpp` buffer selects C++; everything else is C.
    pub fn language(&self) -> Language {
        if self.scope == "cpp" {
            Language::Cpp
        } else {
            Language::from_filetype(&self.filetype)
        }
    }

    /// Returns the path completion parses under.
    ///
    /// When the scope differs from the filetype (C code embedded in another
    /// document) the scope's extension is appended, so the engine picks the
    /// right language and the unit does not collide with the host file's.
    pub fn completion_path(&self) -> PathBuf {
        if self.scope == self.filetype {
            return self.filepath.clone();
        }
        let ext = if self.scope == "cpp" {
            Language::Cpp.extension()
        } else {
            Language::C.extension()
        };
        let mut path = self.filepath.clone().into_os_string();
        path.push(".");
        path.push(ext);
        PathBuf::from(path)
    }

    /// Rejects contexts the engine cannot be queried with.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.filepath.as_os_str().is_empty() {
            return Err(ServiceError::InvalidContext {
                field: "filepath",
                reason: "empty path".to_string(),
            });
        }
        if self.line == 0 {
            return Err(ServiceError::InvalidContext {
                field: "lnum",
                reason: "lines are 1-based".to_string(),
            });
        }
        if self.byte_column == 0 {
            return Err(ServiceError::InvalidContext {
                field: "bcol",
                reason: "columns are 1-based".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(filetype: &str, scope: &str) -> BufferContext {
        BufferContext {
            filepath: PathBuf::from("/p/notes.md"),
            cwd: PathBuf::from("/p"),
            filetype: filetype.to_string(),
            scope: scope.to_string(),
            line: 1,
            byte_column: 1,
            start_column: 1,
            base: String::new(),
            changedtick: RevisionToken(1),
            matcher: None,
        }
    }

    #[test]
    fn language_follows_scope_then_filetype() {
        assert_eq!(ctx("cpp", "cpp").language(), Language::Cpp);
        assert_eq!(ctx("markdown", "cpp").language(), Language::Cpp);
        assert_eq!(ctx("cpp", "c").language(), Language::Cpp);
        assert_eq!(ctx("c", "c").language(), Language::C);
        assert_eq!(ctx("markdown", "c").language(), Language::C);
    }

    #[test]
    fn embedded_scope_gets_virtual_path() {
        assert_eq!(ctx("markdown", "cpp").completion_path(), PathBuf::from("/p/notes.md.cpp"));
        assert_eq!(ctx("markdown", "c").completion_path(), PathBuf::from("/p/notes.md.c"));
        assert_eq!(ctx("c", "c").completion_path(), PathBuf::from("/p/notes.md"));
    }

    #[test]
    fn validation() {
        assert!(ctx("c", "c").validate().is_ok());
        let mut bad = ctx("c", "c");
        bad.line = 0;
        assert!(matches!(
            bad.validate(),
            Err(ServiceError::InvalidContext { field: "lnum", .. })
        ));
        let mut bad = ctx("c", "c");
        bad.filepath = PathBuf::new();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn deserializes_editor_context() {
        let json = r#"{
            "filepath": "/p/a.c", "cwd": "/p", "filetype": "c", "scope": "c",
            "lnum": 3, "bcol": 7, "startccol": 5, "base": "pr",
            "changedtick": 42, "matcher": {"kind": "fuzzy", "case": "ignore"}
        }"#;
        let ctx: BufferContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.line, 3);
        assert_eq!(ctx.byte_column, 7);
        assert_eq!(ctx.start_column, 5);
        assert_eq!(ctx.changedtick, RevisionToken(42));
        assert_eq!(ctx.matcher.unwrap().kind, ccx_config::MatcherKind::Fuzzy);
    }
}
