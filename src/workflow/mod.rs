/// Workflow Graph Layer
///
/// Job nodes, workflow construction and status, the canonical record format,
/// and the registries and storage seam the surrounding runtime plugs into.

// Job node and its state machine
pub mod job;

// Workflow struct and two-phase graph construction
pub mod types;

// Workflow-level predicates and display status
pub mod status;

// Canonical serialized representation
pub mod record;

// Lock-free registries keyed by class/type name
pub mod registry;

// Persistence seam with an in-memory implementation
pub mod storage;

// Re-export commonly used types
pub use job::JobNode;
pub use record::{JobRecord, WorkflowRecord};
pub use registry::{Catalog, Registry};
pub use status::WorkflowStatus;
pub use storage::{MemoryStore, WorkflowStore};
pub use types::{Edge, RunOptions, Workflow, WorkflowDefinition, ADHOC_WORKFLOW_CLASS};
