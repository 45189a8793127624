//! Full engine argument lists: resolved flags plus language and run directory.

use std::path::{Path, PathBuf};

use ccx_common::Fingerprint;
use ccx_config::FlagsConfig;
use ccx_flags::{resolve, FlagOrigin};
use serde::Serialize;

use crate::context::Language;

/// The arguments a file is parsed with, ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerArgs {
    /// `-working-directory=<dir>`, the language flag, then the resolved flags.
    pub args: Vec<String>,
    /// Directory the compiler runs in.
    pub directory: PathBuf,
    /// The source the resolved flags came from.
    pub origin: FlagOrigin,
}

impl CompilerArgs {
    /// Returns the cache fingerprint for these arguments.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(self.args.clone(), self.directory.clone())
    }
}

/// Resolves the flags for `filepath` and completes them for the engine.
///
/// The language flag always precedes the resolved flags, so a `-x` in the
/// project's own flags still wins. The working-directory flag comes first.
pub fn compiler_args(
    filepath: &Path,
    cwd: &Path,
    language: Language,
    config: &FlagsConfig,
) -> CompilerArgs {
    let resolved = resolve(filepath, cwd, config);
    let mut args = Vec::with_capacity(resolved.args.len() + 2);
    args.push(format!(
        "-working-directory={}",
        resolved.directory.display()
    ));
    args.push(language.flag().to_string());
    args.extend(resolved.args);
    CompilerArgs {
        args,
        directory: resolved.directory,
        origin: resolved.origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn no_discovery() -> FlagsConfig {
        FlagsConfig {
            database_paths: vec!["missing_compile_commands.json".to_string()],
            args_file_paths: vec!["missing_flags".to_string()],
            kbuild: false,
        }
    }

    #[test]
    fn default_flags_still_carry_language_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.c");
        let args = compiler_args(&file, dir.path(), Language::C, &no_discovery());
        assert_eq!(
            args.args,
            vec![
                format!("-working-directory={}", dir.path().display()),
                "-xc".to_string(),
            ]
        );
        assert_eq!(args.directory, dir.path());
        assert_eq!(args.origin, FlagOrigin::Default);
    }

    #[test]
    fn resolved_flags_follow_language_flag() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".clang_complete"), "-DFOO -Iinc\n").unwrap();
        let file = dir.path().join("a.cpp");
        let args = compiler_args(&file, dir.path(), Language::Cpp, &FlagsConfig::default());
        assert_eq!(args.args[1], "-xc++");
        assert!(args.args[2..].starts_with(&["-DFOO".to_string(), "-Iinc".to_string()]));
        assert!(matches!(args.origin, FlagOrigin::FlagsFile { .. }));
    }

    #[test]
    fn fingerprint_tracks_language() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.h");
        let c = compiler_args(&file, dir.path(), Language::C, &no_discovery());
        let cpp = compiler_args(&file, dir.path(), Language::Cpp, &no_discovery());
        assert_ne!(c.fingerprint(), cpp.fingerprint());
        assert_eq!(c.fingerprint(), c.clone().fingerprint());
    }
}
