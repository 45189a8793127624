//! Compilation-database (`compile_commands.json`) lookup.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ccx_common::{absolutize, normalize};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::args::{include_flags, pick_useful_args, split_command};
use crate::error::FlagsError;

/// One record of a compilation database.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileCommand {
    /// The working directory of the compilation.
    pub directory: String,
    /// The main source file, absolute or relative to `directory`.
    pub file: String,
    /// The compile command as a single shell-quoted string.
    #[serde(default)]
    pub command: Option<String>,
    /// The compile command as pre-split arguments.
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
}

impl CompileCommand {
    /// Returns the record's working directory, resolved against `db_dir` when relative.
    pub fn working_directory(&self, db_dir: &Path) -> PathBuf {
        absolutize(Path::new(&self.directory), db_dir)
    }

    /// Returns the normalized path of the file this record compiles.
    pub fn source_path(&self, db_dir: &Path) -> PathBuf {
        absolutize(Path::new(&self.file), &self.working_directory(db_dir))
    }

    /// Returns the filtered arguments of this record.
    ///
    /// `arguments` is preferred over `command` when both are present.
    pub fn useful_args(&self) -> Result<Vec<String>, FlagsError> {
        if let Some(arguments) = &self.arguments {
            return Ok(pick_useful_args(arguments));
        }
        if let Some(command) = &self.command {
            return Ok(pick_useful_args(&split_command(command)?));
        }
        Err(FlagsError::MissingCommand {
            file: self.file.clone(),
        })
    }
}

/// Flags derived from a compilation database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseFlags {
    /// Filtered compiler arguments.
    pub args: Vec<String>,
    /// Directory the compiler runs in.
    pub directory: PathBuf,
    /// `true` when a record for the file itself was found, `false` for the
    /// merged fallback.
    pub exact: bool,
}

/// Reads a compilation database and deserializes each record on its own.
///
/// A record with missing or mistyped fields is logged and skipped; only a
/// file that is not a JSON array at all is an error.
pub fn load_database(path: &Path) -> Result<Vec<CompileCommand>, FlagsError> {
    let content = std::fs::read_to_string(path).map_err(|e| FlagsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let values: Vec<serde_json::Value> =
        serde_json::from_str(&content).map_err(|e| FlagsError::Json {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<CompileCommand>(value) {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping record {index} of {}: {e}", path.display()),
        }
    }
    Ok(records)
}

/// Finds the flags for `filepath` in the database at `db_path`.
///
/// An exact record wins. Without one, the include flags of every record are
/// merged (order of first appearance, no duplicates) and followed by the
/// arguments of the last usable record, with the file's own directory as run
/// directory. This gives usable completion in headers, which never have a
/// record of their own.
pub fn flags_from_database(db_path: &Path, filepath: &Path) -> Result<DatabaseFlags, FlagsError> {
    let records = load_database(db_path)?;
    let db_dir = db_path.parent().unwrap_or_else(|| Path::new("/"));
    let target = normalize(filepath);

    for record in &records {
        if record.source_path(db_dir) != target {
            continue;
        }
        match record.useful_args() {
            Ok(args) => {
                debug!("compile_commands record for {}: {:?}", target.display(), record);
                return Ok(DatabaseFlags {
                    args,
                    directory: record.working_directory(db_dir),
                    exact: true,
                });
            }
            Err(e) => warn!("unusable record for {}: {e}", target.display()),
        }
    }

    debug!(
        "no record for {} in {}, merging include paths",
        target.display(),
        db_path.display()
    );
    let args = merged_fallback(&records).ok_or_else(|| FlagsError::NoUsableRecord {
        path: db_path.to_path_buf(),
    })?;
    let directory = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| db_dir.to_path_buf());
    Ok(DatabaseFlags {
        args,
        directory,
        exact: false,
    })
}

/// Union of all `-I` flags followed by the last usable record's arguments.
///
/// Returns `None` when no record yields arguments.
fn merged_fallback(records: &[CompileCommand]) -> Option<Vec<String>> {
    let mut includes = Vec::new();
    let mut seen = HashSet::new();
    let mut last_args = None;

    for record in records {
        match record.useful_args() {
            Ok(args) => {
                for flag in include_flags(&args) {
                    if seen.insert(flag.clone()) {
                        includes.push(flag);
                    }
                }
                last_args = Some(args);
            }
            Err(e) => debug!("fallback skips record: {e}"),
        }
    }

    let last_args = last_args?;
    includes.extend(last_args);
    Some(includes)
}
