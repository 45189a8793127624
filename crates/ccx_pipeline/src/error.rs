//! Error types for pipeline operations.

/// Errors raised by [`Pipeline`](crate::Pipeline) itself, never by tasks.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The worker thread could not be started.
    #[error("failed to spawn worker {name}: {source}")]
    Spawn {
        /// The pipeline name.
        name: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The worker state could not be built.
    #[error("worker {name} failed to initialize: {reason}")]
    Init {
        /// The pipeline name.
        name: String,
        /// Description of the failure.
        reason: String,
    },

    /// The worker has stopped and accepts no more tasks.
    #[error("worker {name} is not running")]
    Stopped {
        /// The pipeline name.
        name: String,
    },

    /// A synchronous call panicked before producing its result.
    #[error("task {task} aborted without a result")]
    Aborted {
        /// The task name.
        task: String,
    },

    /// A synchronous call was made from inside a task, which would deadlock.
    #[error("task {task} submitted synchronously from the worker thread")]
    Reentrant {
        /// The task name.
        task: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_display() {
        let err = PipelineError::Init {
            name: "ccx".to_string(),
            reason: "no engine".to_string(),
        };
        assert_eq!(err.to_string(), "worker ccx failed to initialize: no engine");
    }

    #[test]
    fn aborted_display() {
        let err = PipelineError::Aborted {
            task: "find_declaration".to_string(),
        };
        assert!(err.to_string().contains("find_declaration"));
    }
}
