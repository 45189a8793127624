//! Diagnostics accumulated by a translation unit.

use std::fmt;

use ccx_common::Location;
use serde::{Deserialize, Serialize};

/// How bad an engine diagnostic is. Variants compare in increasing severity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suppressed by the flags in effect.
    Ignored,
    /// Additional context attached to another diagnostic.
    Note,
    /// A potential issue that doesn't stop analysis.
    Warning,
    /// A problem that makes part of the file unanalyzable.
    Error,
    /// A problem that stops analysis of the rest of the file.
    Fatal,
}

impl Severity {
    /// Returns `true` for [`Error`](Severity::Error) and [`Fatal`](Severity::Fatal).
    pub fn is_error(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ignored => write!(f, "ignored"),
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal error"),
        }
    }
}

/// A single diagnostic reported by the engine.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EngineDiagnostic {
    /// How severe the problem is.
    pub severity: Severity,
    /// Where the problem is, when the engine knows.
    pub location: Option<Location>,
    /// The engine's message text.
    pub message: String,
}

impl EngineDiagnostic {
    /// Creates a diagnostic.
    pub fn new(severity: Severity, location: Option<Location>, message: impl Into<String>) -> Self {
        Self {
            severity,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{loc}: {}: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}
