//! Flags scraped from kbuild per-object command files.
//!
//! A Linux kernel build leaves `init/.main.o.cmd` next to `init/main.c`,
//! containing a line such as
//!
//! ```text
//! cmd_init/main.o := gcc -Wp,-MD,init/.main.o.d -nostdinc -I./include -D__KERNEL__ -c -o init/main.o init/main.c
//! ```
//!
//! The invocation is relative to the tree root, which is recovered by
//! stripping the object's directory (`init`) from the source directory.

use std::path::{Path, PathBuf};

use ccx_common::normalize;
use tracing::debug;

use crate::args::{pick_useful_args, split_command};
use crate::error::FlagsError;

/// Flags derived from a kbuild command file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KbuildFlags {
    /// The command file the flags came from.
    pub path: PathBuf,
    /// Filtered compiler arguments.
    pub args: Vec<String>,
    /// Directory the kernel build ran in.
    pub directory: PathBuf,
}

/// Returns the path of the `.<stem>.o.cmd` file that belongs to `filepath`.
pub fn command_file_path(filepath: &Path) -> Option<PathBuf> {
    let dir = filepath.parent()?;
    let stem = filepath.file_stem()?.to_str()?;
    Some(dir.join(format!(".{stem}.o.cmd")))
}

/// Looks for a kbuild command file next to `filepath`.
///
/// Returns `Ok(None)` when there is no command file or it has no `cmd_` line.
pub fn flags_from_kbuild(filepath: &Path, cwd: &Path) -> Result<Option<KbuildFlags>, FlagsError> {
    let Some(cmd_path) = command_file_path(filepath) else {
        return Ok(None);
    };
    if !cmd_path.is_file() {
        debug!("kbuild command file not found: {}", cmd_path.display());
        return Ok(None);
    }
    let content = std::fs::read_to_string(&cmd_path).map_err(|e| FlagsError::Io {
        path: cmd_path.clone(),
        source: e,
    })?;
    let filedir = filepath.parent().unwrap_or(cwd);

    let parsed = parse_command_file(&content, filedir, cwd)?;
    match parsed {
        Some((args, directory)) => {
            debug!(
                "kbuild {} found, args: {:?}, dir: {}",
                cmd_path.display(),
                args,
                directory.display()
            );
            Ok(Some(KbuildFlags {
                path: cmd_path,
                args,
                directory,
            }))
        }
        None => {
            debug!("kbuild {} has no cmd_ line", cmd_path.display());
            Ok(None)
        }
    }
}

/// Extracts `(args, run_directory)` from the first `cmd_<target> := ...` line.
pub fn parse_command_file(
    content: &str,
    filedir: &Path,
    cwd: &Path,
) -> Result<Option<(Vec<String>, PathBuf)>, FlagsError> {
    for line in content.lines() {
        let Some(rest) = line.strip_prefix("cmd_") else {
            continue;
        };
        let Some((target, invocation)) = rest.split_once(":=") else {
            continue;
        };
        let args = pick_useful_args(&split_command(invocation)?);
        let directory = run_directory(target.trim(), filedir, cwd);
        return Ok(Some((args, directory)));
    }
    Ok(None)
}

/// Strips the object's subdirectory from `filedir`, or falls back to `cwd`.
fn run_directory(object: &str, filedir: &Path, cwd: &Path) -> PathBuf {
    let objdir = normalize(Path::new(object).parent().unwrap_or_else(|| Path::new("")));
    if objdir == Path::new(".") {
        return filedir.to_path_buf();
    }
    let depth = objdir.components().count();
    if filedir.ends_with(&objdir) {
        let mut root = filedir.to_path_buf();
        for _ in 0..depth {
            root.pop();
        }
        return root;
    }
    debug!(
        "kbuild object dir {} is not a suffix of {}, using cwd",
        objdir.display(),
        filedir.display()
    );
    cwd.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ERROR_LIMIT_FLAG;

    const MAIN_CMD: &str = "cmd_init/main.o := /usr/bin/ccache aarch64-linux-gnu-gcc -Wp,-MD,init/.main.o.d  -nostdinc -isystem /usr/lib/gcc-cross/aarch64-linux-gnu/7/include -I./arch/arm64/include -I./include -include ./include/linux/kconfig.h -D__KERNEL__ -mlittle-endian -Wall -std=gnu89 -Os -DKBUILD_BASENAME='\"main\"' -c -o init/main.o init/main.c\n";

    #[test]
    fn command_file_name() {
        assert_eq!(
            command_file_path(Path::new("/linux/init/main.c")),
            Some(PathBuf::from("/linux/init/.main.o.cmd"))
        );
    }

    #[test]
    fn parses_kernel_command_line() {
        let (args, dir) = parse_command_file(MAIN_CMD, Path::new("/linux/init"), Path::new("/cwd"))
            .unwrap()
            .unwrap();
        assert_eq!(
            args,
            vec![
                "-nostdinc",
                "-isystem",
                "/usr/lib/gcc-cross/aarch64-linux-gnu/7/include",
                "-I./arch/arm64/include",
                "-I./include",
                "-include",
                "./include/linux/kconfig.h",
                "-D__KERNEL__",
                "-std=gnu89",
                "-DKBUILD_BASENAME=\"main\"",
                ERROR_LIMIT_FLAG,
            ]
        );
        assert_eq!(dir, PathBuf::from("/linux"));
    }

    #[test]
    fn nested_object_dir_is_stripped() {
        let content = "cmd_drivers/net/e1000.o := gcc -DX -c drivers/net/e1000.c\n";
        let objdir = Path::new("/src/linux/drivers/net");
        let (_, dir) = parse_command_file(content, objdir, Path::new("/cwd"))
            .unwrap()
            .unwrap();
        assert_eq!(dir, PathBuf::from("/src/linux"));
    }

    #[test]
    fn object_in_root_uses_file_dir() {
        let content = "cmd_main.o := gcc -DX -c main.c\n";
        let (_, dir) = parse_command_file(content, Path::new("/proj"), Path::new("/cwd"))
            .unwrap()
            .unwrap();
        assert_eq!(dir, PathBuf::from("/proj"));
    }

    #[test]
    fn mismatched_object_dir_uses_cwd() {
        let content = "cmd_other/main.o := gcc -DX -c other/main.c\n";
        let (_, dir) = parse_command_file(content, Path::new("/linux/init"), Path::new("/cwd"))
            .unwrap()
            .unwrap();
        assert_eq!(dir, PathBuf::from("/cwd"));
    }

    #[test]
    fn partial_name_is_not_a_suffix() {
        let content = "cmd_init/main.o := gcc -c init/main.c\n";
        let (_, dir) = parse_command_file(content, Path::new("/linux/myinit"), Path::new("/cwd"))
            .unwrap()
            .unwrap();
        assert_eq!(dir, PathBuf::from("/cwd"));
    }

    #[test]
    fn skips_non_command_lines() {
        let content = "source_init/main.o := init/main.c\n\
                       deps_init/main.o := \\\n  include/linux/init.h\n\
                       cmd_init/main.o := gcc -DLATE -c init/main.c\n";
        let (args, _) = parse_command_file(content, Path::new("/l/init"), Path::new("/cwd"))
            .unwrap()
            .unwrap();
        assert_eq!(args, vec!["-DLATE", ERROR_LIMIT_FLAG]);
    }

    #[test]
    fn no_command_line_is_none() {
        let content = "source_init/main.o := init/main.c\n";
        assert!(parse_command_file(content, Path::new("/l/init"), Path::new("/cwd"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn reads_command_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let init = dir.path().join("init");
        std::fs::create_dir_all(&init).unwrap();
        std::fs::write(init.join(".main.o.cmd"), MAIN_CMD).unwrap();

        let flags = flags_from_kbuild(&init.join("main.c"), Path::new("/cwd"))
            .unwrap()
            .unwrap();
        assert_eq!(flags.directory, dir.path());
        assert_eq!(flags.path, init.join(".main.o.cmd"));
    }

    #[test]
    fn missing_command_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(flags_from_kbuild(&dir.path().join("main.c"), dir.path())
            .unwrap()
            .is_none());
    }
}
