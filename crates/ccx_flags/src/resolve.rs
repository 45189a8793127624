//! Strategy chain that turns a source path into compiler flags.

use std::fmt;
use std::path::{Path, PathBuf};

use ccx_common::absolutize;
use ccx_config::FlagsConfig;
use serde::Serialize;
use tracing::{info, warn};

use crate::compdb::flags_from_database;
use crate::find::find_config;
use crate::flags_file::flags_from_file;
use crate::kbuild::flags_from_kbuild;

/// Where a set of resolved flags came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlagOrigin {
    /// A compilation database.
    CompilationDatabase {
        /// The database file.
        path: PathBuf,
        /// `false` when the merged fallback was used.
        exact: bool,
    },
    /// A kbuild per-object command file.
    Kbuild {
        /// The `.<name>.o.cmd` file.
        path: PathBuf,
    },
    /// A flat flags file.
    FlagsFile {
        /// The flags file.
        path: PathBuf,
    },
    /// Nothing was found.
    Default,
}

impl fmt::Display for FlagOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagOrigin::CompilationDatabase { path, exact: true } => {
                write!(f, "compilation database {}", path.display())
            }
            FlagOrigin::CompilationDatabase { path, exact: false } => {
                write!(f, "compilation database {} (merged)", path.display())
            }
            FlagOrigin::Kbuild { path } => write!(f, "kbuild {}", path.display()),
            FlagOrigin::FlagsFile { path } => write!(f, "flags file {}", path.display()),
            FlagOrigin::Default => write!(f, "default"),
        }
    }
}

/// Compiler arguments for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFlags {
    /// Filtered arguments, without the language or working-directory flags.
    pub args: Vec<String>,
    /// Directory the compiler runs in.
    pub directory: PathBuf,
    /// The source the arguments came from.
    pub origin: FlagOrigin,
}

/// Resolves the flags for `filepath`.
///
/// Relative paths are taken relative to `cwd`. The compilation database is
/// tried first, then the kbuild command file (when enabled), then the flat
/// flags file. Errors from a source are logged and the next source is tried;
/// when all fail the result is empty arguments run from `cwd`.
pub fn resolve(filepath: &Path, cwd: &Path, config: &FlagsConfig) -> ResolvedFlags {
    let cwd = absolutize(cwd, &std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")));
    let filepath = absolutize(filepath, &cwd);
    let filedir = filepath.parent().unwrap_or(cwd.as_path()).to_path_buf();
    let bases = [filedir.as_path(), cwd.as_path()];

    let resolved = from_database(&filepath, &bases, config)
        .or_else(|| {
            if config.kbuild {
                from_kbuild(&filepath, &cwd)
            } else {
                None
            }
        })
        .or_else(|| from_flags_file(&bases, config))
        .unwrap_or_else(|| ResolvedFlags {
            args: Vec::new(),
            directory: cwd.clone(),
            origin: FlagOrigin::Default,
        });

    info!(
        "flags for {} from {}, dir {}",
        filepath.display(),
        resolved.origin,
        resolved.directory.display()
    );
    resolved
}

fn from_database(filepath: &Path, bases: &[&Path], config: &FlagsConfig) -> Option<ResolvedFlags> {
    let found = find_config(bases, &config.database_paths)?;
    match flags_from_database(&found.path, filepath) {
        Ok(flags) => Some(ResolvedFlags {
            args: flags.args,
            directory: flags.directory,
            origin: FlagOrigin::CompilationDatabase {
                path: found.path,
                exact: flags.exact,
            },
        }),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

fn from_kbuild(filepath: &Path, cwd: &Path) -> Option<ResolvedFlags> {
    match flags_from_kbuild(filepath, cwd) {
        Ok(found) => found.map(|flags| ResolvedFlags {
            args: flags.args,
            directory: flags.directory,
            origin: FlagOrigin::Kbuild { path: flags.path },
        }),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

fn from_flags_file(bases: &[&Path], config: &FlagsConfig) -> Option<ResolvedFlags> {
    let found = find_config(bases, &config.args_file_paths)?;
    match flags_from_file(&found.path) {
        Ok(args) => Some(ResolvedFlags {
            args,
            directory: found.directory,
            origin: FlagOrigin::FlagsFile { path: found.path },
        }),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ERROR_LIMIT_FLAG;

    fn config() -> FlagsConfig {
        FlagsConfig::default()
    }

    fn write_database(root: &Path, file: &str, arguments: &[&str]) {
        let db = serde_json::json!([{
            "directory": root,
            "file": file,
            "arguments": arguments,
        }]);
        std::fs::write(root.join("compile_commands.json"), db.to_string()).unwrap();
    }

    #[test]
    fn database_exact_match() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let src = root.join("src");
        std::fs::create_dir_all(&src).unwrap();
        let include = format!("-I{}/inc", root.display());
        write_database(root, "src/a.c", &["/usr/bin/cc", &include, "src/a.c"]);

        let flags = resolve(&src.join("a.c"), root, &config());
        assert_eq!(flags.args, vec![include, ERROR_LIMIT_FLAG.to_string()]);
        assert_eq!(flags.directory, root);
        assert_eq!(
            flags.origin,
            FlagOrigin::CompilationDatabase {
                path: root.join("compile_commands.json"),
                exact: true,
            }
        );
    }

    #[test]
    fn database_in_build_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("build")).unwrap();
        let db = format!(
            r#"[{{"directory":"{}/build","file":"../a.c","command":"cc -DIN_BUILD -c ../a.c"}}]"#,
            root.display()
        );
        std::fs::write(root.join("build/compile_commands.json"), db).unwrap();

        let flags = resolve(&root.join("a.c"), root, &config());
        assert_eq!(flags.args, vec!["-DIN_BUILD", ERROR_LIMIT_FLAG]);
        assert_eq!(flags.directory, root.join("build"));
    }

    #[test]
    fn broken_database_falls_through_to_flags_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("compile_commands.json"), "{oops").unwrap();
        std::fs::write(root.join(".clang_complete"), "-DFALLBACK\n").unwrap();

        let flags = resolve(&root.join("a.c"), root, &config());
        assert_eq!(flags.args, vec!["-DFALLBACK", ERROR_LIMIT_FLAG]);
        assert_eq!(
            flags.origin,
            FlagOrigin::FlagsFile {
                path: root.join(".clang_complete")
            }
        );
    }

    #[test]
    fn kbuild_before_flags_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let init = root.join("init");
        std::fs::create_dir_all(&init).unwrap();
        std::fs::write(
            init.join(".main.o.cmd"),
            "cmd_init/main.o := gcc -D__KERNEL__ -c -o init/main.o init/main.c\n",
        )
        .unwrap();
        std::fs::write(root.join(".clang_complete"), "-DFLAT\n").unwrap();

        let flags = resolve(&init.join("main.c"), root, &config());
        assert_eq!(flags.args, vec!["-D__KERNEL__", ERROR_LIMIT_FLAG]);
        assert_eq!(flags.directory, root);
        assert!(matches!(flags.origin, FlagOrigin::Kbuild { .. }));
    }

    #[test]
    fn database_before_kbuild_and_flags_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_database(root, "main.c", &["cc", "-DFROM_DB", "-c", "main.c"]);
        std::fs::write(root.join(".main.o.cmd"), "cmd_main.o := gcc -DK -c main.c\n").unwrap();
        std::fs::write(root.join(".clang_complete"), "-DFLAT\n").unwrap();

        let flags = resolve(&root.join("main.c"), root, &config());
        assert_eq!(flags.args, vec!["-DFROM_DB", ERROR_LIMIT_FLAG]);
        assert_eq!(
            flags.origin,
            FlagOrigin::CompilationDatabase {
                path: root.join("compile_commands.json"),
                exact: true,
            }
        );
    }

    #[test]
    fn kbuild_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join(".main.o.cmd"), "cmd_main.o := gcc -DK -c main.c\n").unwrap();
        std::fs::write(root.join(".clang_complete"), "-DFLAT\n").unwrap();

        let mut cfg = config();
        cfg.kbuild = false;
        let flags = resolve(&root.join("main.c"), root, &cfg);
        assert_eq!(flags.args, vec!["-DFLAT", ERROR_LIMIT_FLAG]);
    }

    #[test]
    fn flags_file_directory_is_where_found() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let deep = root.join("a").join("b");
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(root.join(".clang_complete"), "-Iinc\n").unwrap();

        let flags = resolve(&deep.join("x.cpp"), &deep, &config());
        assert_eq!(flags.directory, root);
    }

    #[test]
    fn relative_filepath_resolved_against_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join(".clang_complete"), "-DREL\n").unwrap();

        let flags = resolve(Path::new("src/./x.c"), root, &config());
        assert_eq!(flags.args, vec!["-DREL", ERROR_LIMIT_FLAG]);
    }

    #[test]
    fn custom_names_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join(".clang_complete"), "-DDEFAULT_NAME\n").unwrap();
        std::fs::write(root.join("flags.txt"), "-DCUSTOM\n").unwrap();

        let mut cfg = config();
        cfg.args_file_paths = vec!["flags.txt".to_string()];
        let flags = resolve(&root.join("x.c"), root, &cfg);
        assert_eq!(flags.args, vec!["-DCUSTOM", ERROR_LIMIT_FLAG]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join(".clang_complete"), "-DA -DB\n").unwrap();
        let first = resolve(&root.join("x.c"), root, &config());
        let second = resolve(&root.join("x.c"), root, &config());
        assert_eq!(first, second);
    }

    #[test]
    fn nothing_found_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = FlagsConfig {
            database_paths: vec!["ccx-test-missing.json".to_string()],
            args_file_paths: vec!["ccx-test-missing.flags".to_string()],
            kbuild: false,
        };
        let flags = resolve(&dir.path().join("x.c"), dir.path(), &cfg);
        assert!(flags.args.is_empty());
        assert_eq!(flags.directory, dir.path());
        assert_eq!(flags.origin, FlagOrigin::Default);
    }

    #[test]
    fn origin_display() {
        let origin = FlagOrigin::CompilationDatabase {
            path: PathBuf::from("/p/compile_commands.json"),
            exact: false,
        };
        assert_eq!(
            origin.to_string(),
            "compilation database /p/compile_commands.json (merged)"
        );
        assert_eq!(FlagOrigin::Default.to_string(), "default");
    }
}
