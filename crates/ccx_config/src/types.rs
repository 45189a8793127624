//! Configuration types deserialized from `ccx.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Default compilation-database names, searched in order in every directory.
pub const DEFAULT_DATABASE_PATHS: &[&str] =
    &["compile_commands.json", "build/compile_commands.json"];

/// Default flat flags-file names.
pub const DEFAULT_ARGS_FILE_PATHS: &[&str] = &[".clang_complete"];

/// The top-level configuration parsed from `ccx.toml`.
///
/// Every section is optional; an empty file yields [`CcxConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcxConfig {
    /// Where the flag extractor looks for build configuration.
    #[serde(default)]
    pub flags: FlagsConfig,
    /// Completion matching and cache warm-up behaviour.
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Names of the build-configuration files the flag extractor searches for.
///
/// Names may contain a relative directory (`build/compile_commands.json`);
/// they are joined onto every directory visited while walking upward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagsConfig {
    /// Compilation-database file names, tried in order.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(
        default = "default_database_paths",
        deserialize_with = "deserialize_string_or_vec"
    )]
    pub database_paths: Vec<String>,
    /// Flat flags-file names, tried in order.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(
        default = "default_args_file_paths",
        deserialize_with = "deserialize_string_or_vec"
    )]
    pub args_file_paths: Vec<String>,
    /// Whether to scrape kbuild `.<name>.o.cmd` files next to the source.
    #[serde(default = "default_true")]
    pub kbuild: bool,
}

impl Default for FlagsConfig {
    fn default() -> Self {
        Self {
            database_paths: default_database_paths(),
            args_file_paths: default_args_file_paths(),
            kbuild: true,
        }
    }
}

/// Completion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Matcher used when the editor does not select one per request.
    #[serde(default)]
    pub matcher: MatcherSpec,
    /// Reparse a freshly created completion unit once before first use.
    #[serde(default = "default_true")]
    pub warm_reparse: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherSpec::default(),
            warm_reparse: true,
        }
    }
}

/// Selects a candidate matcher: what kind of match and how case is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherSpec {
    /// The matching algorithm.
    #[serde(default)]
    pub kind: MatcherKind,
    /// Case sensitivity policy.
    #[serde(default)]
    pub case: CaseMode,
}

/// The matching algorithm applied to a candidate's typed text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    /// The candidate starts with the filter text (default).
    #[default]
    Prefix,
    /// The candidate contains the filter text.
    Substr,
    /// The filter characters appear in order in the candidate.
    Fuzzy,
}

/// Case sensitivity policy for matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Case-insensitive unless the filter contains an uppercase letter (default).
    #[default]
    Smart,
    /// Always case-insensitive.
    Ignore,
    /// Always case-sensitive.
    Respect,
}

fn default_database_paths() -> Vec<String> {
    DEFAULT_DATABASE_PATHS.iter().map(|s| s.to_string()).collect()
}

fn default_args_file_paths() -> Vec<String> {
    DEFAULT_ARGS_FILE_PATHS.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows TOML config to accept both `database_paths = "cc.json"` (string) and
/// `database_paths = ["cc.json", "out/cc.json"]` (array of strings).
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
