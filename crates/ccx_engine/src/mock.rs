//! A scripted in-memory engine that records every call.
//!
//! [`MockEngine`] is moved to the thread that drives it; the matching
//! [`MockHandle`] stays with the test to script responses and inspect the
//! call log. Engine calls can be held with [`MockHandle::pause`] to make
//! queue-ordering tests deterministic.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::chunk::CompletionResult;
use crate::diagnostic::EngineDiagnostic;
use crate::engine::{AnalysisEngine, CursorTargets, TranslationUnit, UnsavedFile};
use crate::error::EngineError;
use crate::options::{CompleteOptions, ParseOptions};

/// One recorded engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// A fresh parse.
    Parse {
        /// The file parsed.
        path: PathBuf,
        /// The arguments passed.
        args: Vec<String>,
        /// The parse options passed.
        options: ParseOptions,
        /// The unsaved text for `path`, if any.
        text: Option<String>,
    },
    /// An incremental reparse.
    Reparse {
        /// The unit's file.
        path: PathBuf,
        /// The unsaved text for the unit's file, if any.
        text: Option<String>,
    },
    /// A completion query.
    Complete {
        /// The file queried.
        path: PathBuf,
        /// The 1-based line.
        line: u32,
        /// The 1-based byte column.
        column: u32,
    },
    /// A cursor query.
    Cursor {
        /// The file queried.
        path: PathBuf,
        /// The 1-based line.
        line: u32,
        /// The 1-based byte column.
        column: u32,
    },
    /// A unit was dropped.
    Release {
        /// The unit's file.
        path: PathBuf,
    },
}

#[derive(Debug, Default)]
struct Script {
    completions: Vec<CompletionResult>,
    targets: CursorTargets,
    diagnostics: Vec<EngineDiagnostic>,
    fail_parse: Option<String>,
    fail_reparse: Option<String>,
    fail_query: Option<String>,
}

#[derive(Debug, Default)]
struct Shared {
    script: Mutex<Script>,
    calls: Mutex<Vec<MockCall>>,
    paused: Mutex<bool>,
    resumed: Condvar,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn record(&self, call: MockCall) {
        lock(&self.calls).push(call);
    }

    fn wait_if_paused(&self) {
        let mut paused = lock(&self.paused);
        while *paused {
            paused = self
                .resumed
                .wait(paused)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Test-side handle for scripting and inspecting a [`MockEngine`].
#[derive(Debug, Clone, Default)]
pub struct MockHandle {
    shared: Arc<Shared>,
}

impl MockHandle {
    /// Sets the candidates every completion query returns.
    pub fn set_completions(&self, completions: Vec<CompletionResult>) {
        lock(&self.shared.script).completions = completions;
    }

    /// Sets the targets every cursor query returns.
    pub fn set_targets(&self, targets: CursorTargets) {
        lock(&self.shared.script).targets = targets;
    }

    /// Sets the diagnostics every unit reports.
    pub fn set_diagnostics(&self, diagnostics: Vec<EngineDiagnostic>) {
        lock(&self.shared.script).diagnostics = diagnostics;
    }

    /// Makes parses fail with `reason`, or succeed again with `None`.
    pub fn fail_parse(&self, reason: Option<&str>) {
        lock(&self.shared.script).fail_parse = reason.map(str::to_string);
    }

    /// Makes reparses fail with `reason`, or succeed again with `None`.
    pub fn fail_reparse(&self, reason: Option<&str>) {
        lock(&self.shared.script).fail_reparse = reason.map(str::to_string);
    }

    /// Makes completion and cursor queries fail with `reason`.
    pub fn fail_query(&self, reason: Option<&str>) {
        lock(&self.shared.script).fail_query = reason.map(str::to_string);
    }

    /// Blocks every following parse, reparse and query until [`resume`](Self::resume).
    pub fn pause(&self) {
        *lock(&self.shared.paused) = true;
    }

    /// Releases calls held by [`pause`](Self::pause).
    pub fn resume(&self) {
        *lock(&self.shared.paused) = false;
        self.shared.resumed.notify_all();
    }

    /// Returns a copy of the call log.
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.shared.calls).clone()
    }

    /// Clears the call log.
    pub fn clear_calls(&self) {
        lock(&self.shared.calls).clear();
    }

    /// Number of fresh parses so far.
    pub fn parse_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Parse { .. }))
    }

    /// Number of incremental reparses so far.
    pub fn reparse_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Reparse { .. }))
    }

    /// Number of released units so far.
    pub fn release_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Release { .. }))
    }

    /// Number of completion queries so far.
    pub fn complete_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Complete { .. }))
    }

    fn count(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        lock(&self.shared.calls).iter().filter(|c| pred(c)).count()
    }
}

/// The engine side of the mock.
#[derive(Debug, Default)]
pub struct MockEngine {
    shared: Arc<Shared>,
}

impl MockEngine {
    /// Creates an engine and its test handle.
    pub fn new() -> (Self, MockHandle) {
        let handle = MockHandle::default();
        (Self::from_handle(&handle), handle)
    }

    /// Creates another engine sharing `handle`'s script and call log.
    pub fn from_handle(handle: &MockHandle) -> Self {
        Self {
            shared: Arc::clone(&handle.shared),
        }
    }
}

fn text_for(path: &Path, unsaved: &[UnsavedFile]) -> Option<String> {
    unsaved
        .iter()
        .find(|u| u.path == path)
        .map(|u| u.contents.clone())
}

impl AnalysisEngine for MockEngine {
    type Unit = MockUnit;

    fn parse(
        &mut self,
        path: &Path,
        args: &[String],
        unsaved: &[UnsavedFile],
        options: ParseOptions,
    ) -> Result<MockUnit, EngineError> {
        self.shared.wait_if_paused();
        self.shared.record(MockCall::Parse {
            path: path.to_path_buf(),
            args: args.to_vec(),
            options,
            text: text_for(path, unsaved),
        });
        if let Some(reason) = lock(&self.shared.script).fail_parse.clone() {
            return Err(EngineError::Parse {
                path: path.to_path_buf(),
                reason,
            });
        }
        Ok(MockUnit {
            path: path.to_path_buf(),
            shared: Arc::clone(&self.shared),
        })
    }
}

/// A translation unit of the [`MockEngine`]. Records a release when dropped.
#[derive(Debug)]
pub struct MockUnit {
    path: PathBuf,
    shared: Arc<Shared>,
}

impl MockUnit {
    /// The file this unit was parsed from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn query_failure(&self, path: &Path, line: u32, column: u32) -> Option<EngineError> {
        lock(&self.shared.script)
            .fail_query
            .clone()
            .map(|reason| EngineError::Query {
                path: path.to_path_buf(),
                line,
                column,
                reason,
            })
    }
}

impl TranslationUnit for MockUnit {
    fn reparse(&mut self, unsaved: &[UnsavedFile]) -> Result<(), EngineError> {
        self.shared.wait_if_paused();
        self.shared.record(MockCall::Reparse {
            path: self.path.clone(),
            text: text_for(&self.path, unsaved),
        });
        match lock(&self.shared.script).fail_reparse.clone() {
            Some(reason) => Err(EngineError::Reparse {
                path: self.path.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }

    fn code_complete(
        &mut self,
        path: &Path,
        line: u32,
        column: u32,
        _unsaved: &[UnsavedFile],
        _options: CompleteOptions,
    ) -> Result<Vec<CompletionResult>, EngineError> {
        self.shared.wait_if_paused();
        self.shared.record(MockCall::Complete {
            path: path.to_path_buf(),
            line,
            column,
        });
        if let Some(err) = self.query_failure(path, line, column) {
            return Err(err);
        }
        Ok(lock(&self.shared.script).completions.clone())
    }

    fn diagnostics(&self) -> Vec<EngineDiagnostic> {
        lock(&self.shared.script).diagnostics.clone()
    }

    fn cursor_targets(
        &self,
        path: &Path,
        line: u32,
        column: u32,
    ) -> Result<CursorTargets, EngineError> {
        self.shared.wait_if_paused();
        self.shared.record(MockCall::Cursor {
            path: path.to_path_buf(),
            line,
            column,
        });
        if let Some(err) = self.query_failure(path, line, column) {
            return Err(err);
        }
        Ok(lock(&self.shared.script).targets.clone())
    }
}

impl Drop for MockUnit {
    fn drop(&mut self) {
        self.shared.record(MockCall::Release {
            path: self.path.clone(),
        });
    }
}
