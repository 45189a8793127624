//! Reduction of a compiler command line to the flags the engine needs.
//!
//! This is an allow-list, not a compiler-flag grammar. Only search paths,
//! macro definitions, the language standard and forced includes survive;
//! optimization, warning and code-generation flags are dropped.

use crate::error::FlagsError;

/// Appended to every argument list so files with many errors still parse.
pub const ERROR_LIMIT_FLAG: &str = "-ferror-limit=99999999";

/// Include-path options. Exact matches take the next token as their value.
const INCLUDE_OPTS: &[&str] = &[
    "-I",
    "-isystem",
    "-internal-isystem",
    "-internal-externc-isystem",
];

/// Macro-definition options.
const DEFINE_OPTS: &[&str] = &["-D"];

/// Other options kept together with their value.
const EXTRA_OPTS_WITH_ARG: &[&str] = &["-std", "-include"];

/// Options kept verbatim that never take a value.
const OPTS_WITHOUT_ARG: &[&str] = &["-nostdinc"];

/// What the filter does with a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    /// Keep the token.
    Keep,
    /// Keep the token and the one after it.
    KeepWithValue,
    /// Discard the token.
    Drop,
}

fn opts_with_arg() -> impl Iterator<Item = &'static str> {
    INCLUDE_OPTS
        .iter()
        .chain(DEFINE_OPTS)
        .chain(EXTRA_OPTS_WITH_ARG)
        .copied()
}

fn classify(token: &str) -> Disposition {
    if OPTS_WITHOUT_ARG.contains(&token) {
        return Disposition::Keep;
    }
    if opts_with_arg().any(|opt| opt == token) {
        return Disposition::KeepWithValue;
    }
    if opts_with_arg().any(|opt| token.starts_with(opt)) {
        return Disposition::Keep;
    }
    Disposition::Drop
}

fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

/// Filters a tokenized compiler invocation down to engine-safe flags.
///
/// Leading non-flag tokens are removed first: the compiler executable and any
/// wrapper in front of it (`ccache`, `distcc`). [`ERROR_LIMIT_FLAG`] is always
/// appended.
pub fn pick_useful_args<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut args = Vec::new();
    let mut take_value = false;

    for token in tokens
        .iter()
        .map(AsRef::as_ref)
        .skip_while(|token| !is_flag(token))
    {
        if take_value {
            args.push(token.to_string());
            take_value = false;
            continue;
        }
        match classify(token) {
            Disposition::Keep => args.push(token.to_string()),
            Disposition::KeepWithValue => {
                args.push(token.to_string());
                take_value = true;
            }
            Disposition::Drop => {}
        }
    }

    args.push(ERROR_LIMIT_FLAG.to_string());
    args
}

/// Splits a shell-quoted command line into words.
pub fn split_command(command: &str) -> Result<Vec<String>, FlagsError> {
    shlex::split(command).ok_or_else(|| FlagsError::ShellSplit {
        command: command.to_string(),
    })
}

/// Returns every include directory of a filtered argument list as `-I<dir>`.
///
/// Both the joined (`-Ifoo`) and the split (`-I foo`) spellings are recognized.
pub(crate) fn include_flags(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "-I" {
            if let Some(dir) = iter.next() {
                out.push(format!("-I{dir}"));
            }
        } else if arg.starts_with("-I") {
            out.push(arg.clone());
        }
    }
    out
}
