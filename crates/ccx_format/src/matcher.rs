//! Candidate matchers.
//!
//! The editor picks how candidates are matched against what the user has
//! typed so far. Three algorithms are built in, each with a case policy;
//! all of them score through `nucleo-matcher`.

use std::cell::RefCell;
use std::fmt;

use ccx_config::{CaseMode, MatcherKind, MatcherSpec};
use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Utf32Str};

/// Decides whether a candidate survives the user's filter text.
pub trait Matcher {
    /// Returns `true` if `candidate` matches `filter`.
    fn matches(&self, filter: &str, candidate: &str) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&str, &str) -> bool,
{
    fn matches(&self, filter: &str, candidate: &str) -> bool {
        self(filter, candidate)
    }
}

/// A matcher selected by [`MatcherSpec`], backed by `nucleo-matcher` atoms.
///
/// Holds one scoring buffer, so a matcher is built per request and reused
/// for every candidate of that request.
pub struct BuiltinMatcher {
    spec: MatcherSpec,
    engine: RefCell<nucleo_matcher::Matcher>,
    haystack: RefCell<Vec<char>>,
}

impl BuiltinMatcher {
    /// Creates the matcher described by `spec`.
    pub fn new(spec: MatcherSpec) -> Self {
        Self {
            spec,
            engine: RefCell::new(nucleo_matcher::Matcher::new(Config::DEFAULT)),
            haystack: RefCell::new(Vec::new()),
        }
    }

    /// Returns the spec this matcher was built from.
    pub fn spec(&self) -> MatcherSpec {
        self.spec
    }

    fn atom(&self, filter: &str) -> Atom {
        let case = match self.spec.case {
            CaseMode::Smart => CaseMatching::Smart,
            CaseMode::Ignore => CaseMatching::Ignore,
            CaseMode::Respect => CaseMatching::Respect,
        };
        let kind = match self.spec.kind {
            MatcherKind::Prefix => AtomKind::Prefix,
            MatcherKind::Substr => AtomKind::Substring,
            MatcherKind::Fuzzy => AtomKind::Fuzzy,
        };
        Atom::new(filter, case, Normalization::Smart, kind, false)
    }
}

impl Default for BuiltinMatcher {
    fn default() -> Self {
        Self::new(MatcherSpec::default())
    }
}

impl From<MatcherSpec> for BuiltinMatcher {
    fn from(spec: MatcherSpec) -> Self {
        Self::new(spec)
    }
}

impl fmt::Debug for BuiltinMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinMatcher")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl Matcher for BuiltinMatcher {
    fn matches(&self, filter: &str, candidate: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let atom = self.atom(filter);
        let mut engine = self.engine.borrow_mut();
        let mut buf = self.haystack.borrow_mut();
        atom.score(Utf32Str::new(candidate, &mut buf), &mut engine)
            .is_some()
    }
}
