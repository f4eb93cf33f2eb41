/// Persistence seam for workflow state
///
/// Real persistence lives in the surrounding runtime. `WorkflowStore` is the
/// interface it implements; records always cross it in their canonical JSON
/// form. `MemoryStore` is the in-process implementation used by tests and
/// single-process embeddings.

use crate::workflow::{registry::Registry, types::Workflow};
use anyhow::Result;
use arc_swap::ArcSwap;
use std::{collections::HashMap, sync::Arc};

/// Storage backend for serialized workflows
pub trait WorkflowStore: Send + Sync {
    /// Store a new workflow or overwrite an existing one
    fn save(&self, workflow: &Workflow) -> Result<()>;

    /// Load and rebuild a workflow by id
    fn load(&self, id: &str, registry: &Registry) -> Result<Option<Workflow>>;

    /// Delete a workflow by id, returning whether it existed
    fn delete(&self, id: &str) -> Result<bool>;

    /// Ids of all stored workflows, sorted
    fn ids(&self) -> Result<Vec<String>>;
}

/// In-memory store keeping one JSON record per workflow id
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key: workflow id, Value: serialized `WorkflowRecord`
    records: ArcSwap<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: ArcSwap::new(Arc::new(HashMap::new())),
        }
    }
}

impl WorkflowStore for MemoryStore {
    fn save(&self, workflow: &Workflow) -> Result<()> {
        let json = workflow.to_json()?;
        let id = workflow.id().to_string();

        self.records.rcu(|current| {
            let mut next = (**current).clone();
            next.insert(id.clone(), json.clone());
            next
        });

        tracing::debug!("💾 Saved workflow '{}' ({} jobs)", id, workflow.total());
        Ok(())
    }

    fn load(&self, id: &str, registry: &Registry) -> Result<Option<Workflow>> {
        match self.records.load().get(id) {
            Some(json) => {
                let workflow = Workflow::from_json(json, registry)
                    .map_err(|e| anyhow::anyhow!("Failed to load workflow '{}': {}", id, e))?;
                Ok(Some(workflow))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut removed = false;
        self.records.rcu(|current| {
            let mut next = (**current).clone();
            removed = next.remove(id).is_some();
            next
        });
        Ok(removed)
    }

    fn ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.records.load().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::RunOptions;

    #[test]
    fn saves_and_loads_workflow_state() {
        let store = MemoryStore::new();
        let registry = Registry::new();

        let mut flow = Workflow::new("wf-1");
        flow.run("Prepare", RunOptions::new()).unwrap();
        flow.run("Fetch", RunOptions::new()).unwrap();
        flow.create_dependencies().unwrap();
        flow.mark_finished("Prepare").unwrap();
        store.save(&flow).unwrap();

        let loaded = store.load("wf-1", &registry).unwrap().unwrap();
        assert_eq!(loaded.to_record(), flow.to_record());
        assert_eq!(store.ids().unwrap(), ["wf-1"]);
    }

    #[test]
    fn missing_workflow_loads_as_none() {
        let store = MemoryStore::new();
        assert!(store.load("nope", &Registry::new()).unwrap().is_none());
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let store = MemoryStore::new();
        store.save(&Workflow::new("wf-2")).unwrap();

        assert!(store.delete("wf-2").unwrap());
        assert!(!store.delete("wf-2").unwrap());
        assert!(store.ids().unwrap().is_empty());
    }
}
