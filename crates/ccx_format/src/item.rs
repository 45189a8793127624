//! Completion items and the result formatter.

use std::fmt;

use ccx_engine::{Chunk, CompletionResult};
use serde::Serialize;

use crate::matcher::Matcher;
use crate::snippet::placeholder;

/// An editor-ready completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    /// The identifier the candidate inserts and is matched on.
    pub word: String,
    /// Short text shown next to the word: result type and signature.
    pub menu: String,
    /// The full signature, optional parameters in brackets.
    pub info: String,
    /// Snippet to expand instead of `word`, when it differs from `word`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Why a result produced no completion item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The result has nothing the user can type to select it.
    NoTypedText,
    /// The result is an operator overload.
    Operator,
    /// The matcher rejected the typed text.
    Filtered,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoTypedText => write!(f, "no typed text"),
            Rejection::Operator => write!(f, "operator overload"),
            Rejection::Filtered => write!(f, "filtered"),
        }
    }
}

/// `operator` followed by a non-identifier character: `operator==`,
/// `operator new`, `operator()`. A plain identifier named `operator` or
/// `operator_id` is kept.
fn is_operator(word: &str) -> bool {
    match word.strip_prefix("operator") {
        Some(rest) => rest
            .chars()
            .next()
            .is_some_and(|c| !(c.is_alphanumeric() || c == '_')),
        None => false,
    }
}

/// Formats one completion result, or says why it is rejected.
///
/// `filter` is the text the user has typed at the completion position; it is
/// checked against the result's typed text with `matcher` before anything is
/// built.
pub fn format(
    result: &CompletionResult,
    filter: &str,
    matcher: &dyn Matcher,
) -> Result<CompletionItem, Rejection> {
    let word = result.typed_text().ok_or(Rejection::NoTypedText)?;
    if is_operator(word) {
        return Err(Rejection::Operator);
    }
    if !matcher.matches(filter, word) {
        return Err(Rejection::Filtered);
    }

    let mut snippet = String::new();
    let mut info = String::new();
    let mut result_type = None;
    let mut next_placeholder = 1;

    for chunk in &result.chunks {
        match chunk {
            Chunk::Informative(_) => {}
            Chunk::ResultType(text) => result_type = Some(text.as_str()),
            Chunk::Optional(group) => {
                for alternative in roll_out(group) {
                    snippet.push_str(&placeholder(next_placeholder, &alternative));
                    next_placeholder += 1;
                    info.push('[');
                    info.push_str(&alternative);
                    info.push(']');
                }
            }
            Chunk::Placeholder(text) => {
                snippet.push_str(&placeholder(next_placeholder, text));
                next_placeholder += 1;
                info.push_str(text);
            }
            Chunk::Text(text) | Chunk::TypedText(text) => {
                snippet.push_str(text);
                info.push_str(text);
            }
        }
    }

    let menu = match result_type {
        Some(ty) => format!("{ty} {info}"),
        None => info.clone(),
    };
    let snippet = (snippet != word).then_some(snippet);

    Ok(CompletionItem {
        word: word.to_string(),
        menu,
        info,
        snippet,
    })
}

/// Flattens an optional group into one alternative per nesting level.
///
/// The first alternative is the group's own text; nested groups follow,
/// outermost first.
fn roll_out(group: &[Chunk]) -> Vec<String> {
    let mut text = String::new();
    let mut nested = Vec::new();
    for chunk in group {
        match chunk {
            Chunk::Informative(_) | Chunk::ResultType(_) | Chunk::TypedText(_) => {}
            Chunk::Optional(inner) => nested.extend(roll_out(inner)),
            Chunk::Text(s) | Chunk::Placeholder(s) => text.push_str(s),
        }
    }
    let mut alternatives = vec![text];
    alternatives.extend(nested);
    alternatives
}
