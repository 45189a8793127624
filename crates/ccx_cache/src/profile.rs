//! The two tunings a cache can be created with.

use std::fmt;

use ccx_engine::ParseOptions;

/// Which kind of query a cache serves.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CacheProfile {
    /// Frequent completion queries: function bodies skipped, results cached.
    Completion,
    /// Go-to-definition: full detail so every symbol resolves.
    Navigation,
}

impl CacheProfile {
    /// Returns the engine parse options for this profile.
    pub fn parse_options(self) -> ParseOptions {
        match self {
            CacheProfile::Completion => ParseOptions::completion(),
            CacheProfile::Navigation => ParseOptions::navigation(),
        }
    }
}

impl fmt::Display for CacheProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheProfile::Completion => write!(f, "completion"),
            CacheProfile::Navigation => write!(f, "navigation"),
        }
    }
}
