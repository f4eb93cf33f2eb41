/// Runtime-facing queries and seams
///
/// This module answers the runtime's questions about a workflow and defines
/// the hooks it implements:
/// - Frontier resolution with depth-bounded cycle protection
/// - Petgraph topology view for whole-graph validation
/// - Per-job logger factory
/// - Job handler trait dispatched by job type

// Frontier resolver: next_jobs and dependency sweeps
pub mod frontier;

// Petgraph DAG view and topological ordering
pub mod topology;

// Logger factory strategy
pub mod logger;

// Business-logic seam implemented by the runtime
pub mod handler;

// Re-export main types
pub use handler::JobHandler;
pub use logger::{JobLogger, LoggerBuilder, TracingLoggerBuilder};
pub use topology::WorkflowTopology;
