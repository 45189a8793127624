//! Engine and translation-unit traits.

use std::path::{Path, PathBuf};

use ccx_common::Location;

use crate::chunk::CompletionResult;
use crate::diagnostic::EngineDiagnostic;
use crate::error::EngineError;
use crate::options::{CompleteOptions, ParseOptions};

/// In-memory contents that override a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsavedFile {
    /// The file being overridden.
    pub path: PathBuf,
    /// The buffer text.
    pub contents: String,
}

impl UnsavedFile {
    /// Creates an override for `path`.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// A position a cursor query resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorTarget {
    /// The file of the target; `None` for builtins and invalid locations.
    pub file: Option<PathBuf>,
    /// The 1-based line.
    pub line: u32,
    /// The 1-based byte column.
    pub column: u32,
}

impl CursorTarget {
    /// Creates a target in `file`.
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: Some(file.into()),
            line,
            column,
        }
    }

    /// Converts to a [`Location`] when the target has a file.
    pub fn to_location(&self) -> Option<Location> {
        self.file
            .as_ref()
            .map(|file| Location::new(file.clone(), self.line, self.column))
    }
}

/// What the symbol under a cursor resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorTargets {
    /// The definition of the symbol, when visible in this unit.
    pub definition: Option<CursorTarget>,
    /// The declaration the cursor refers to.
    pub referenced: Option<CursorTarget>,
}

impl CursorTargets {
    /// Returns the first target with a file, preferring the definition.
    pub fn best_location(&self) -> Option<Location> {
        [&self.definition, &self.referenced]
            .into_iter()
            .flatten()
            .find_map(CursorTarget::to_location)
    }
}

/// A handle to the external analysis engine.
///
/// One handle (the engine's "index") backs one cache. Implementations are
/// driven from a single thread and need not be `Send` or `Sync`.
pub trait AnalysisEngine {
    /// The translation unit type this engine produces.
    type Unit: TranslationUnit;

    /// Parses `path` with compiler `args`, reading `unsaved` instead of disk
    /// for the files it lists.
    fn parse(
        &mut self,
        path: &Path,
        args: &[String],
        unsaved: &[UnsavedFile],
        options: ParseOptions,
    ) -> Result<Self::Unit, EngineError>;
}

/// A parsed source file. Dropping the unit releases it in the engine.
pub trait TranslationUnit {
    /// Incrementally reparses against new buffer contents, reusing the
    /// precompiled preamble when one exists.
    fn reparse(&mut self, unsaved: &[UnsavedFile]) -> Result<(), EngineError>;

    /// Returns completion candidates at a 1-based line and byte column.
    fn code_complete(
        &mut self,
        path: &Path,
        line: u32,
        column: u32,
        unsaved: &[UnsavedFile],
        options: CompleteOptions,
    ) -> Result<Vec<CompletionResult>, EngineError>;

    /// Returns the diagnostics of the last parse or reparse.
    fn diagnostics(&self) -> Vec<EngineDiagnostic>;

    /// Resolves the symbol at a 1-based line and byte column.
    fn cursor_targets(&self, path: &Path, line: u32, column: u32)
        -> Result<CursorTargets, EngineError>;
}
