//! Task results as the dispatch loop sees them.

use std::fmt;

use crate::generation::Cancelled;

/// How a task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The task did its work.
    Completed,
    /// The task noticed it was superseded and stopped early.
    Cancelled,
    /// The task hit an error; the message is logged.
    Failed(String),
}

/// Early exit from a task body, for use with `?`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// A checkpoint found the request superseded.
    #[error("cancelled")]
    Cancelled,
    /// Any other error.
    #[error("{0}")]
    Failed(String),
}

impl TaskError {
    /// Wraps any displayable error as a failure.
    pub fn failed(err: impl fmt::Display) -> Self {
        TaskError::Failed(err.to_string())
    }
}

impl From<Cancelled> for TaskError {
    fn from(_: Cancelled) -> Self {
        TaskError::Cancelled
    }
}

impl From<Result<(), TaskError>> for TaskOutcome {
    fn from(result: Result<(), TaskError>) -> Self {
        match result {
            Ok(()) => TaskOutcome::Completed,
            Err(TaskError::Cancelled) => TaskOutcome::Cancelled,
            Err(TaskError::Failed(reason)) => TaskOutcome::Failed(reason),
        }
    }
}
