/// Core workflow type definitions
///
/// A workflow owns its job nodes in declaration order plus the ordering
/// requests collected while it is being configured. Construction is two-phase:
/// `run` records deferred edges, `create_dependencies` turns them into the
/// `incoming`/`outgoing` lists on both endpoints.

use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::runtime::logger::{LoggerBuilder, TracingLoggerBuilder};
use crate::workflow::job::JobNode;
use std::{collections::HashMap, fmt, sync::Arc};

/// Class name used for workflows that are not built from a registered definition
pub const ADHOC_WORKFLOW_CLASS: &str = "Workflow";

/// A workflow instance: job nodes, their edges and workflow-level flags
#[derive(Clone)]
pub struct Workflow {
    /// Unique workflow instance identifier
    pub(crate) id: String,
    /// Declared workflow type
    pub(crate) klass: String,
    /// Job nodes in declaration order
    pub(crate) nodes: Vec<JobNode>,
    /// Node name -> position in `nodes`
    pub(crate) index: HashMap<String, usize>,
    /// Ordering requests not yet resolved into adjacency lists
    pub(crate) pending_edges: Vec<Edge>,
    /// Manual pause flag, advisory for the runtime
    pub(crate) stopped: bool,
    pub(crate) graph_config: GraphConfig,
    pub(crate) logger_builder: Arc<dyn LoggerBuilder>,
}

/// A deferred ordering request: `from` must finish before `to` may run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Upstream job name
    pub from: String,
    /// Downstream job name
    pub to: String,
}

/// Options for `Workflow::run`
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit node name; defaults to the job type
    pub name: Option<String>,
    /// Jobs the new node must follow
    pub after: Vec<String>,
    /// Jobs the new node must precede
    pub before: Vec<String>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn after(mut self, job: impl Into<String>) -> Self {
        self.after.push(job.into());
        self
    }

    pub fn before(mut self, job: impl Into<String>) -> Self {
        self.before.push(job.into());
        self
    }

    pub fn after_all<I, S>(mut self, jobs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after.extend(jobs.into_iter().map(Into::into));
        self
    }

    pub fn before_all<I, S>(mut self, jobs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.before.extend(jobs.into_iter().map(Into::into));
        self
    }
}

/// A named workflow type whose `configure` declares its jobs
///
/// Definitions are registered by name in the `Registry` so a persisted
/// workflow can be rebuilt from its class name.
pub trait WorkflowDefinition: Send + Sync {
    /// Workflow class name, stored as `name`/`klass` in records
    fn name(&self) -> &str;

    /// Declare the jobs of this workflow with `Workflow::run`
    fn configure(&self, workflow: &mut Workflow) -> GraphResult<()>;
}

impl Workflow {
    /// Create an empty ad-hoc workflow with the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            klass: ADHOC_WORKFLOW_CLASS.to_string(),
            nodes: Vec::new(),
            index: HashMap::new(),
            pending_edges: Vec::new(),
            stopped: false,
            graph_config: GraphConfig::default(),
            logger_builder: Arc::new(TracingLoggerBuilder),
        }
    }

    /// Create an empty ad-hoc workflow with a random UUID id
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    /// Build a workflow from a definition: configure it, then finalize edges
    pub fn from_definition(
        id: impl Into<String>,
        definition: &dyn WorkflowDefinition,
    ) -> GraphResult<Self> {
        let mut workflow = Self::new(id);
        workflow.klass = definition.name().to_string();

        tracing::debug!("🏗️ Configuring workflow '{}' ({})", workflow.id, workflow.klass);
        definition.configure(&mut workflow)?;
        workflow.create_dependencies()?;

        Ok(workflow)
    }

    /// Replace the frontier resolver parameters
    pub fn with_graph_config(mut self, config: GraphConfig) -> Self {
        self.graph_config = config;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Workflow type name (same value as `klass`)
    pub fn name(&self) -> &str {
        &self.klass
    }

    pub fn klass(&self) -> &str {
        &self.klass
    }

    pub fn nodes(&self) -> &[JobNode] {
        &self.nodes
    }

    pub fn graph_config(&self) -> GraphConfig {
        self.graph_config
    }

    /// Number of jobs
    pub fn total(&self) -> usize {
        self.nodes.len()
    }

    /// Number of finished jobs
    pub fn finished_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.finished).count()
    }

    /// Whether every ordering request has been resolved into edges
    pub fn is_finalized(&self) -> bool {
        self.pending_edges.is_empty()
    }

    /// Ordering requests still waiting for `create_dependencies`
    pub fn pending_edges(&self) -> &[Edge] {
        &self.pending_edges
    }

    /// Declare a job
    ///
    /// Without `after`/`before`, the job follows the most recently declared
    /// one. All ordering is recorded as deferred edges, so `after`/`before`
    /// may name jobs declared later.
    pub fn run(
        &mut self,
        job_type: impl Into<String>,
        options: RunOptions,
    ) -> GraphResult<&JobNode> {
        let job_type = job_type.into();
        let RunOptions { name, after, before } = options;
        let name = name.unwrap_or_else(|| job_type.clone());

        if self.index.contains_key(&name) {
            return Err(GraphError::DuplicateJob { name });
        }

        if after.is_empty() && before.is_empty() {
            if let Some(last) = self.nodes.last() {
                self.pending_edges.push(Edge {
                    from: last.name.clone(),
                    to: name.clone(),
                });
            }
        }
        for upstream in after {
            self.pending_edges.push(Edge {
                from: upstream,
                to: name.clone(),
            });
        }
        for downstream in before {
            self.pending_edges.push(Edge {
                from: name.clone(),
                to: downstream,
            });
        }

        tracing::debug!("  ➕ Declared job '{}' (type: {})", name, job_type);

        let position = self.nodes.len();
        self.index.insert(name.clone(), position);
        self.nodes.push(JobNode::new(name, job_type));

        Ok(&self.nodes[position])
    }

    /// Resolve deferred ordering requests into adjacency lists
    ///
    /// Repeated edges are stored once, so calling this again is a no-op. If
    /// any request names an unknown job nothing is applied.
    pub fn create_dependencies(&mut self) -> GraphResult<()> {
        let resolved = self
            .pending_edges
            .iter()
            .map(|edge| Ok((self.position(&edge.from)?, self.position(&edge.to)?)))
            .collect::<GraphResult<Vec<(usize, usize)>>>()?;

        tracing::debug!(
            "🔗 Resolving {} deferred edges for workflow '{}'",
            resolved.len(),
            self.id
        );

        for (from, to) in resolved {
            let upstream = self.nodes[from].name.clone();
            let downstream = self.nodes[to].name.clone();

            if !self.nodes[from].outgoing.contains(&downstream) {
                self.nodes[from].outgoing.push(downstream.clone());
            }
            if !self.nodes[to].incoming.contains(&upstream) {
                self.nodes[to].incoming.push(upstream);
            }
        }
        self.pending_edges.clear();

        Ok(())
    }

    /// Find a job by name
    pub fn find_job(&self, name: &str) -> GraphResult<&JobNode> {
        let position = self.position(name)?;
        Ok(&self.nodes[position])
    }

    /// Find a job by name for a state transition
    pub fn find_job_mut(&mut self, name: &str) -> GraphResult<&mut JobNode> {
        let position = self.position(name)?;
        Ok(&mut self.nodes[position])
    }

    /// Jobs with no upstream dependencies, in declaration order
    pub fn initial_jobs(&self) -> Vec<&JobNode> {
        self.nodes.iter().filter(|n| n.has_no_dependencies()).collect()
    }

    pub fn mark_enqueued(&mut self, name: &str) -> GraphResult<()> {
        self.find_job_mut(name)?.mark_enqueued();
        Ok(())
    }

    pub fn mark_running(&mut self, name: &str) -> GraphResult<()> {
        self.find_job_mut(name)?.mark_running();
        Ok(())
    }

    pub fn mark_finished(&mut self, name: &str) -> GraphResult<()> {
        self.find_job_mut(name)?.mark_finished();
        Ok(())
    }

    pub fn mark_failed(&mut self, name: &str) -> GraphResult<()> {
        self.find_job_mut(name)?.mark_failed();
        Ok(())
    }

    pub(crate) fn position(&self, name: &str) -> GraphResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::not_found(name))
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("id", &self.id)
            .field("klass", &self.klass)
            .field("nodes", &self.nodes)
            .field("pending_edges", &self.pending_edges)
            .field("stopped", &self.stopped)
            .field("graph_config", &self.graph_config)
            .field("logger_builder", &self.logger_builder.name())
            .finish()
    }
}
