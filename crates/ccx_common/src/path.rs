//! Lexical path normalization.
//!
//! Compilation databases and editor buffers spell the same file in different
//! ways (`/p/./src/../a.c` vs `/p/a.c`). Comparisons go through [`normalize`],
//! which never touches the filesystem, so results do not depend on symlinks
//! or on whether the file exists.

use std::path::{Component, Path, PathBuf};

/// Collapses `.` and `..` components without consulting the filesystem.
///
/// A `..` directly below the root is dropped; a leading `..` in a relative
/// path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Resolves `path` against `base` when relative, then normalizes it.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_cur_dir() {
        assert_eq!(normalize(Path::new("/p/./a.c")), PathBuf::from("/p/a.c"));
    }

    #[test]
    fn resolves_parent_dir() {
        assert_eq!(
            normalize(Path::new("/p/src/../inc/a.h")),
            PathBuf::from("/p/inc/a.h")
        );
    }

    #[test]
    fn parent_of_root_stays_root() {
        assert_eq!(normalize(Path::new("/../a.c")), PathBuf::from("/a.c"));
    }

    #[test]
    fn leading_parent_in_relative_path_kept() {
        assert_eq!(normalize(Path::new("../a/./b")), PathBuf::from("../a/b"));
    }

    #[test]
    fn empty_result_is_dot() {
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!(normalize(Path::new("/p/build/")), PathBuf::from("/p/build"));
    }

    #[test]
    fn absolutize_relative() {
        assert_eq!(
            absolutize(Path::new("src/../a.c"), Path::new("/p")),
            PathBuf::from("/p/a.c")
        );
    }

    #[test]
    fn absolutize_absolute_ignores_base() {
        assert_eq!(
            absolutize(Path::new("/q/a.c"), Path::new("/p")),
            PathBuf::from("/q/a.c")
        );
    }
}
