//! Compiler-flag extraction for C-family source files.
//!
//! Given a source file and a working directory, [`resolve`] finds the
//! compiler arguments the project builds that file with and the directory the
//! compiler runs in. Three sources are tried in order: a compilation database
//! (`compile_commands.json`), a kbuild per-object command file
//! (`.<name>.o.cmd`), and a flat flags file (`.clang_complete`). The raw
//! command line is reduced by [`pick_useful_args`] to include paths, macro
//! definitions and a few language options, since that is all the analysis
//! engine needs and unknown flags can make it refuse to parse.
//!
//! Resolution never fails: missing or malformed configuration is logged and
//! degrades to an empty argument list.

#![warn(missing_docs)]

pub mod args;
pub mod compdb;
pub mod error;
pub mod find;
pub mod flags_file;
pub mod kbuild;
pub mod resolve;

pub use args::{pick_useful_args, split_command, ERROR_LIMIT_FLAG};
pub use compdb::{flags_from_database, CompileCommand, DatabaseFlags};
pub use error::FlagsError;
pub use find::{find_config, FoundConfig};
pub use flags_file::flags_from_file;
pub use kbuild::{flags_from_kbuild, KbuildFlags};
pub use resolve::{resolve, FlagOrigin, ResolvedFlags};
