/// Error types for the workflow graph core
///
/// Structural and configuration problems surface as `GraphError`. A job that
/// failed at runtime is not an error here: it is node state, and the frontier
/// simply routes around it.

use thiserror::Error;

/// Result alias used across the graph core
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised while building, querying or loading a workflow
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// No job with this name exists in the workflow
    #[error("job not found: {name}")]
    NotFound { name: String },

    /// The dependency walk went deeper than the workflow allows,
    /// which means the graph is cyclic or malformed
    #[error("dependency level too deep while resolving '{job}' (limit {limit})")]
    DependencyLevelTooDeep { job: String, limit: usize },

    /// Whole-graph validation found a cycle through this job
    #[error("cycle detected through job '{job}'")]
    CycleDetected { job: String },

    /// A job with this name was already declared
    #[error("duplicate job name: {name}")]
    DuplicateJob { name: String },

    /// No workflow definition is registered under this class name
    #[error("unknown workflow class: {klass}")]
    UnknownWorkflow { klass: String },

    /// No logger builder is registered under this name
    #[error("unknown logger builder: {name}")]
    UnknownLoggerBuilder { name: String },

    /// A serialized record is internally inconsistent
    #[error("invalid workflow record: {reason}")]
    InvalidRecord { reason: String },

    /// JSON encoding or decoding failed
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GraphError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn too_deep(job: impl Into<String>, limit: usize) -> Self {
        Self::DependencyLevelTooDeep {
            job: job.into(),
            limit,
        }
    }

    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            reason: reason.into(),
        }
    }
}
