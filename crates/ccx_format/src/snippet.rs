//! Snippet placeholder rendering.

/// Renders placeholder `num` with default text `text`.
///
/// Produces `${num:text}`, or `${num}` for empty text. Backslash, `$` and `}`
/// in the text are backslash-escaped.
pub fn placeholder(num: usize, text: &str) -> String {
    if text.is_empty() {
        return format!("${{{num}}}");
    }
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '$' | '}') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("${{{num}:{escaped}}}")
}
