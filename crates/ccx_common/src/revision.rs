//! Editor buffer revision tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The editor's change counter for a buffer at the time it was read.
///
/// Two equal tokens for the same buffer mean the text has not changed, so a
/// cached translation unit can be reused without reparsing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionToken(pub u64);

impl fmt::Display for RevisionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl From<u64> for RevisionToken {
    fn from(tick: u64) -> Self {
        Self(tick)
    }
}
