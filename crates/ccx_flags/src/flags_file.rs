//! Flat flags files in the `.clang_complete` format.
//!
//! The file holds compiler flags separated by whitespace or newlines. Words
//! may reference environment variables (`$HOME`, `${SDK}`) and start with
//! `~`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::args::{pick_useful_args, split_command};
use crate::error::FlagsError;

/// Reads a flags file and returns its filtered arguments.
pub fn flags_from_file(path: &Path) -> Result<Vec<String>, FlagsError> {
    let content = std::fs::read_to_string(path).map_err(|e| FlagsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let args = parse_flags_file(&content, |name| std::env::var(name).ok(), dirs::home_dir())?;
    debug!("flags file {} args: {:?}", path.display(), args);
    Ok(args)
}

/// Parses flags-file content with the given variable lookup and home directory.
pub fn parse_flags_file<F>(
    content: &str,
    lookup: F,
    home: Option<PathBuf>,
) -> Result<Vec<String>, FlagsError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut words = Vec::new();
    // Split per line: a `#` word comments out the rest of its own line only.
    for line in content.lines() {
        for word in split_command(line)? {
            words.push(expand_home(&expand_vars(&word, &lookup), home.as_deref()));
        }
    }
    Ok(pick_useful_args(&words))
}

/// Replaces `$NAME` and `${NAME}` with their values.
///
/// References to unset variables are left as written.
fn expand_vars<F>(word: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(word.len());
    let mut rest = word;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, reference_len) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match (name.is_empty(), lookup(name)) {
            (false, Some(value)) => out.push_str(&value),
            _ => out.push_str(&rest[pos..pos + 1 + reference_len]),
        }
        rest = &after[reference_len..];
    }
    out.push_str(rest);
    out
}

/// Replaces a leading `~` or `~/` with the home directory.
fn expand_home(word: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return word.to_string();
    };
    if word == "~" {
        return home.display().to_string();
    }
    match word.strip_prefix("~/") {
        Some(rest) => home.join(rest).display().to_string(),
        None => word.to_string(),
    }
}
