//! Error types for service operations.

use ccx_pipeline::PipelineError;

/// Errors returned to the editor by [`SourceService`](crate::SourceService).
///
/// Engine and configuration failures are not among them: completion failures
/// yield an empty list and definition failures a message plus no location.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The worker could not be started or has stopped.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The request context cannot be used.
    #[error("invalid buffer context: {field}: {reason}")]
    InvalidContext {
        /// The offending field, by its editor name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_context_display() {
        let err = ServiceError::InvalidContext {
            field: "bcol",
            reason: "columns are 1-based".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid buffer context: bcol: columns are 1-based"
        );
    }

    #[test]
    fn pipeline_error_is_transparent() {
        let err = ServiceError::from(PipelineError::Stopped {
            name: "ccx".to_string(),
        });
        assert_eq!(err.to_string(), "worker ccx is not running");
    }
}
