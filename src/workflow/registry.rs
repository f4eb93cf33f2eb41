/// Lock-free registries for workflow definitions, job handlers and logger builders
///
/// Each catalog keeps its entries behind an ArcSwap. Registration clones the
/// map and swaps the pointer, so lookups from concurrent runtime threads never
/// block and always see a consistent snapshot. Registries are populated at
/// process start and replace dynamic lookup of types by name.

use crate::error::{GraphError, GraphResult};
use crate::runtime::handler::JobHandler;
use crate::runtime::logger::{LoggerBuilder, TracingLoggerBuilder};
use crate::workflow::job::JobNode;
use crate::workflow::types::{Workflow, WorkflowDefinition};
use arc_swap::ArcSwap;
use std::{collections::HashMap, fmt, sync::Arc};

/// Named entries behind an atomically swapped map
pub struct Catalog<T: ?Sized> {
    entries: ArcSwap<HashMap<String, Arc<T>>>,
}

impl<T: ?Sized> Catalog<T> {
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::new(Arc::new(HashMap::new())),
        }
    }

    /// Add or replace an entry
    pub fn register(&self, name: impl Into<String>, entry: Arc<T>) {
        let name = name.into();
        self.entries.rcu(|current| {
            let mut next = (**current).clone();
            next.insert(name.clone(), Arc::clone(&entry));
            next
        });
    }

    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.entries.load().get(name).cloned()
    }

    /// Remove an entry, returning whether it existed
    pub fn remove(&self, name: &str) -> bool {
        let mut removed = false;
        self.entries.rcu(|current| {
            let mut next = (**current).clone();
            removed = next.remove(name).is_some();
            next
        });
        removed
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.load().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}

impl<T: ?Sized> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Catalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Everything the runtime needs to rebuild and drive workflows by name
#[derive(Debug)]
pub struct Registry {
    workflows: Catalog<dyn WorkflowDefinition>,
    jobs: Catalog<dyn JobHandler>,
    loggers: Catalog<dyn LoggerBuilder>,
}

impl Registry {
    /// Empty registry with the default tracing logger builder
    pub fn new() -> Self {
        let registry = Self {
            workflows: Catalog::new(),
            jobs: Catalog::new(),
            loggers: Catalog::new(),
        };
        registry.register_logger_builder(Arc::new(TracingLoggerBuilder));
        registry
    }

    pub fn register_workflow(&self, definition: Arc<dyn WorkflowDefinition>) {
        let klass = definition.name().to_string();
        tracing::info!("📋 Registered workflow class: {}", klass);
        self.workflows.register(klass, definition);
    }

    pub fn register_job(&self, job_type: impl Into<String>, handler: Arc<dyn JobHandler>) {
        let job_type = job_type.into();
        tracing::info!("🧩 Registered job type: {}", job_type);
        self.jobs.register(job_type, handler);
    }

    pub fn register_logger_builder(&self, builder: Arc<dyn LoggerBuilder>) {
        let name = builder.name().to_string();
        tracing::debug!("🪵 Registered logger builder: {}", name);
        self.loggers.register(name, builder);
    }

    pub fn workflow_definition(&self, klass: &str) -> GraphResult<Arc<dyn WorkflowDefinition>> {
        self.workflows
            .get(klass)
            .ok_or_else(|| GraphError::UnknownWorkflow {
                klass: klass.to_string(),
            })
    }

    /// Instantiate, configure and finalize a registered workflow class
    pub fn build_workflow(&self, klass: &str, id: impl Into<String>) -> GraphResult<Workflow> {
        let definition = self.workflow_definition(klass)?;
        Workflow::from_definition(id, definition.as_ref())
    }

    /// Handler registered for this job's type
    pub fn handler_for(&self, job: &JobNode) -> Option<Arc<dyn JobHandler>> {
        self.jobs.get(job.job_type())
    }

    pub fn logger_builder(&self, name: &str) -> GraphResult<Arc<dyn LoggerBuilder>> {
        self.loggers
            .get(name)
            .ok_or_else(|| GraphError::UnknownLoggerBuilder {
                name: name.to_string(),
            })
    }

    pub fn workflow_classes(&self) -> Vec<String> {
        self.workflows.names()
    }

    pub fn job_types(&self) -> Vec<String> {
        self.jobs.names()
    }

    /// Remove a job handler
    pub fn remove_job(&self, job_type: &str) -> bool {
        let removed = self.jobs.remove(job_type);
        if removed {
            tracing::info!("Removed job type from registry: {}", job_type);
        }
        removed
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
