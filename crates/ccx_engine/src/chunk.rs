//! The structured completion result returned by the engine.

use serde::{Deserialize, Serialize};

/// One piece of a completion candidate.
///
/// Optional groups nest: a default argument list is an `Optional` whose
/// chunks may contain further `Optional` groups.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Chunk {
    /// Literal text inserted as-is (punctuation, keywords).
    Text(String),
    /// The identifier the user types to select the candidate.
    TypedText(String),
    /// Annotation shown to the user but never inserted.
    Informative(String),
    /// The declared type of the candidate's result.
    ResultType(String),
    /// An optional group, e.g. trailing parameters with default values.
    Optional(Vec<Chunk>),
    /// A parameter the user must fill in.
    Placeholder(String),
}

impl Chunk {
    /// Returns the chunk's own text; empty for optional groups.
    pub fn text(&self) -> &str {
        match self {
            Chunk::Text(s)
            | Chunk::TypedText(s)
            | Chunk::Informative(s)
            | Chunk::ResultType(s)
            | Chunk::Placeholder(s) => s,
            Chunk::Optional(_) => "",
        }
    }
}

/// One completion candidate as a chunk sequence.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct CompletionResult {
    /// The candidate's chunks in display order.
    pub chunks: Vec<Chunk>,
}

impl CompletionResult {
    /// Creates a result from its chunks.
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Returns the text of the first top-level typed-text chunk.
    pub fn typed_text(&self) -> Option<&str> {
        self.chunks.iter().find_map(|chunk| match chunk {
            Chunk::TypedText(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_text_found() {
        let result = CompletionResult::new(vec![
            Chunk::ResultType("int".into()),
            Chunk::TypedText("foo".into()),
            Chunk::Text("(".into()),
        ]);
        assert_eq!(result.typed_text(), Some("foo"));
    }

    #[test]
    fn typed_text_inside_optional_is_ignored() {
        let result = CompletionResult::new(vec![Chunk::Optional(vec![Chunk::TypedText(
            "hidden".into(),
        )])]);
        assert_eq!(result.typed_text(), None);
    }

    #[test]
    fn optional_has_no_text() {
        assert_eq!(Chunk::Optional(vec![Chunk::Text("x".into())]).text(), "");
        assert_eq!(Chunk::Placeholder("int x".into()).text(), "int x");
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_value(Chunk::Placeholder("int x".into())).unwrap();
        assert_eq!(json["kind"], "placeholder");
        assert_eq!(json["value"], "int x");
    }
}
