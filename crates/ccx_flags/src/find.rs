//! Upward search for build-configuration files.

use std::path::{Path, PathBuf};

/// A configuration file located by [`find_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundConfig {
    /// Full path of the file.
    pub path: PathBuf,
    /// The directory the search was at when the file matched.
    ///
    /// For a name with a subdirectory (`build/compile_commands.json`) this is
    /// the directory the name was joined onto, not the file's parent.
    pub directory: PathBuf,
}

/// Walks upward from each base in turn looking for any of `names`.
///
/// Bases are searched one after another: every ancestor of the first base is
/// exhausted before the second base is considered. Within one directory the
/// names are tried in order. Bases are expected to be absolute.
pub fn find_config<S: AsRef<str>>(bases: &[&Path], names: &[S]) -> Option<FoundConfig> {
    for base in bases {
        for dir in base.ancestors() {
            for name in names {
                let candidate = dir.join(name.as_ref());
                if candidate.is_file() {
                    return Some(FoundConfig {
                        path: candidate,
                        directory: dir.to_path_buf(),
                    });
                }
            }
        }
    }
    None
}
