//! Option sets passed to the engine's parse and completion calls.

use serde::{Deserialize, Serialize};

/// Options for creating a translation unit.
///
/// Each field corresponds to one engine parse flag. The two cache profiles
/// pick mutually exclusive combinations, so one unit cannot serve both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Build a precompiled preamble so reparses skip the include prologue.
    pub precompiled_preamble: bool,
    /// Record macro definitions and expansions.
    pub detailed_processing_record: bool,
    /// Keep completion results cached inside the unit.
    pub cache_completion_results: bool,
    /// Skip the bodies of functions outside the main file region being edited.
    pub skip_function_bodies: bool,
    /// Accept a unit that is not a complete program (headers, partial edits).
    pub incomplete: bool,
    /// Continue parsing after fatal errors such as missing includes.
    pub keep_going: bool,
}

impl ParseOptions {
    /// Options tuned for latency: bodies skipped, completion results cached.
    pub const fn completion() -> Self {
        Self {
            precompiled_preamble: true,
            detailed_processing_record: true,
            cache_completion_results: true,
            skip_function_bodies: true,
            incomplete: true,
            keep_going: true,
        }
    }

    /// Options tuned for accurate symbol resolution: full detail, no skipping.
    pub const fn navigation() -> Self {
        Self {
            precompiled_preamble: true,
            detailed_processing_record: true,
            cache_completion_results: false,
            skip_function_bodies: false,
            incomplete: true,
            keep_going: true,
        }
    }
}

/// Options for a code-completion query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompleteOptions {
    /// Offer macros as candidates.
    pub include_macros: bool,
    /// Offer code patterns (`for (...) { }`, `#include <...>`).
    pub include_code_patterns: bool,
}

impl CompleteOptions {
    /// Macros and code patterns.
    pub const fn standard() -> Self {
        Self {
            include_macros: true,
            include_code_patterns: true,
        }
    }
}
