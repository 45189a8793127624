//! The seam between ccx and the external semantic-analysis engine.
//!
//! The engine parses a C-family source file with a set of compiler flags into
//! a [`TranslationUnit`], reparses it incrementally against unsaved buffer
//! contents, and answers completion and cursor queries against it. ccx only
//! orchestrates these calls; the engine itself is supplied by the embedding
//! application through [`AnalysisEngine`].
//!
//! With the `mock` feature (and always in this crate's own tests) the
//! [`mock`] module provides a scripted engine that records every call.

#![warn(missing_docs)]

pub mod chunk;
pub mod diagnostic;
pub mod engine;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod options;

pub use chunk::{Chunk, CompletionResult};
pub use diagnostic::{EngineDiagnostic, Severity};
pub use engine::{AnalysisEngine, CursorTarget, CursorTargets, TranslationUnit, UnsavedFile};
pub use error::EngineError;
pub use options::{CompleteOptions, ParseOptions};
