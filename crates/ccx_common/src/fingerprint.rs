//! Cache-validity keys for parsed translation units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The `{args, directory}` pair a translation unit was parsed with.
///
/// A cached unit may only be queried while its stored fingerprint equals the
/// fingerprint recomputed for the current request. Equality compares both
/// fields, and argument order is significant.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    args: Vec<String>,
    directory: PathBuf,
}

impl Fingerprint {
    /// Creates a fingerprint from the final argument list and run directory.
    pub fn new(args: Vec<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            args,
            directory: directory.into(),
        }
    }

    /// Returns the compiler arguments in the order they are passed to the engine.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the directory the engine runs in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Computes a stable XXH3-64 digest of this fingerprint.
    ///
    /// Only used to correlate log lines; cache validity always compares the
    /// full fingerprint.
    pub fn digest(&self) -> u64 {
        let mut bytes = Vec::new();
        for arg in &self.args {
            bytes.extend_from_slice(arg.as_bytes());
            bytes.push(0);
        }
        bytes.push(0xff);
        bytes.extend_from_slice(self.directory.to_string_lossy().as_bytes());
        xxhash_rust::xxh3::xxh3_64(&bytes)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.digest())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprint")
            .field("args", &self.args)
            .field("directory", &self.directory)
            .finish()
    }
}
