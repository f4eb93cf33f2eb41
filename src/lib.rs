/// Jobweave: dependency-graph core for job workflows
///
/// Models a workflow as a DAG of named jobs, tracks each job's execution
/// state, and tells the surrounding runtime which jobs can be enqueued next.
/// Queues, workers and persistence are the runtime's business; this crate is
/// synchronous, in-memory and performs no I/O.

// Configuration and tracing setup for embedding binaries
pub mod config;

// Error types shared by every layer
pub mod error;

// Workflow graph layer - jobs, construction, status, records, registries
pub mod workflow;

// Runtime-facing layer - frontier resolution, topology, logger and handler seams
pub mod runtime;

// Re-export commonly used types for external consumers
pub use config::{Config, GraphConfig};
pub use error::{GraphError, GraphResult};
pub use runtime::{JobHandler, JobLogger, LoggerBuilder, TracingLoggerBuilder};
pub use workflow::{
    JobNode, Registry, RunOptions, Workflow, WorkflowDefinition, WorkflowRecord, WorkflowStatus,
};
