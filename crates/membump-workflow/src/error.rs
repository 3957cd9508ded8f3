//! Workflow orchestration error types.

/// Errors returned while resolving, fetching, or republishing a workflow
/// definition.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A required cluster tool is not installed.
    #[error("dependency missing: {0}")]
    DependencyMissing(String),
    /// A cluster command exited with a failure status.
    #[error("command failed: {command}: {detail}")]
    CommandFailed {
        /// Rendered command line.
        command: String,
        /// Captured stderr, or the exit status when stderr was empty.
        detail: String,
    },
    /// A scheduler report lacks a field the pipeline needs.
    #[error("field '{0}' not found in scheduler report")]
    MissingField(&'static str),
    /// The job must be terminated before its definition may be patched.
    #[error("job {id} is in status {status}; kill it before patching")]
    NotTerminated {
        /// Id the pipeline was asked to patch.
        id: String,
        /// Status the scheduler reported.
        status: String,
    },
    /// The mutation engine rejected the document.
    #[error("mutation failed: {0}")]
    Engine(#[from] membump_engine::EngineError),
}
