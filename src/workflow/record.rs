/// Canonical serialized form of a workflow and its jobs
///
/// This is the persisted-state contract between processes: field names and
/// order are stable. Summary fields (`status`, `total`, `finished`,
/// `started_at`, `finished_at`) are derived on the way out and checked or
/// recomputed on the way in.

use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::workflow::job::JobNode;
use crate::workflow::registry::Registry;
use crate::workflow::status::WorkflowStatus;
use crate::workflow::types::Workflow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serialized workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub id: String,
    /// Workflow type name
    pub name: String,
    /// Same as `name`
    pub klass: String,
    pub status: WorkflowStatus,
    pub total: usize,
    pub finished: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stopped: bool,
    /// Name of the logger builder the workflow uses
    pub logger_builder: String,
    pub nodes: Vec<JobRecord>,
}

/// Serialized job node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub name: String,
    /// Job type
    pub klass: String,
    pub finished: bool,
    pub enqueued: bool,
    pub failed: bool,
    pub running: bool,
    pub incoming: Vec<String>,
    pub outgoing: Vec<String>,
    pub finished_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

impl From<&JobNode> for JobRecord {
    fn from(node: &JobNode) -> Self {
        Self {
            name: node.name.clone(),
            klass: node.job_type.clone(),
            finished: node.finished,
            enqueued: node.enqueued,
            failed: node.failed,
            running: node.running,
            incoming: node.incoming.clone(),
            outgoing: node.outgoing.clone(),
            finished_at: node.finished_at,
            started_at: node.started_at,
            failed_at: node.failed_at,
        }
    }
}

impl From<JobRecord> for JobNode {
    fn from(record: JobRecord) -> Self {
        Self {
            name: record.name,
            job_type: record.klass,
            incoming: record.incoming,
            outgoing: record.outgoing,
            enqueued: record.enqueued,
            running: record.running,
            finished: record.finished,
            failed: record.failed,
            started_at: record.started_at,
            finished_at: record.finished_at,
            failed_at: record.failed_at,
        }
    }
}

impl Workflow {
    /// Snapshot the workflow as a record
    pub fn to_record(&self) -> WorkflowRecord {
        WorkflowRecord {
            id: self.id.clone(),
            name: self.klass.clone(),
            klass: self.klass.clone(),
            status: self.status(),
            total: self.total(),
            finished: self.finished_count(),
            started_at: self.started_at(),
            finished_at: self.finished_at(),
            stopped: self.stopped,
            logger_builder: self.logger_builder.name().to_string(),
            nodes: self.nodes.iter().map(JobRecord::from).collect(),
        }
    }

    pub fn to_json(&self) -> GraphResult<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    /// Rebuild a workflow from a record
    ///
    /// The logger builder is looked up by name in `registry`. A record is
    /// rejected when its name and class differ, when its counts disagree with
    /// the job list, or when a job is listed twice. Jobs must not be both
    /// finished and failed, nor both enqueued and running. Every edge must
    /// name known jobs and appear on both of its ends.
    pub fn from_record(record: WorkflowRecord, registry: &Registry) -> GraphResult<Self> {
        if record.name != record.klass {
            return Err(GraphError::invalid_record(format!(
                "name '{}' does not match class '{}'",
                record.name, record.klass
            )));
        }
        if record.total != record.nodes.len() {
            return Err(GraphError::invalid_record(format!(
                "total is {} but {} jobs are listed",
                record.total,
                record.nodes.len()
            )));
        }
        let finished = record.nodes.iter().filter(|n| n.finished).count();
        if record.finished != finished {
            return Err(GraphError::invalid_record(format!(
                "finished is {} but {} jobs are finished",
                record.finished, finished
            )));
        }

        let mut index = HashMap::with_capacity(record.nodes.len());
        for (position, node) in record.nodes.iter().enumerate() {
            if index.insert(node.name.clone(), position).is_some() {
                return Err(GraphError::invalid_record(format!(
                    "job '{}' is listed twice",
                    node.name
                )));
            }
        }
        for node in &record.nodes {
            if node.finished && node.failed {
                return Err(GraphError::invalid_record(format!(
                    "job '{}' is both finished and failed",
                    node.name
                )));
            }
            if node.enqueued && node.running {
                return Err(GraphError::invalid_record(format!(
                    "job '{}' is both enqueued and running",
                    node.name
                )));
            }
            if let Some(unknown) = node
                .incoming
                .iter()
                .chain(&node.outgoing)
                .find(|name| !index.contains_key(name.as_str()))
            {
                return Err(GraphError::invalid_record(format!(
                    "job '{}' references unknown job '{}'",
                    node.name, unknown
                )));
            }
        }
        for node in &record.nodes {
            let child_missing = node
                .outgoing
                .iter()
                .find(|child| !record.nodes[index[child.as_str()]].incoming.contains(&node.name));
            if let Some(child) = child_missing {
                return Err(GraphError::invalid_record(format!(
                    "edge '{}' -> '{}' is missing from the incoming list of '{}'",
                    node.name, child, child
                )));
            }
            let parent_missing = node
                .incoming
                .iter()
                .find(|parent| !record.nodes[index[parent.as_str()]].outgoing.contains(&node.name));
            if let Some(parent) = parent_missing {
                return Err(GraphError::invalid_record(format!(
                    "edge '{}' -> '{}' is missing from the outgoing list of '{}'",
                    parent, node.name, parent
                )));
            }
        }

        let logger_builder = registry.logger_builder(&record.logger_builder)?;

        Ok(Self {
            id: record.id,
            klass: record.klass,
            nodes: record.nodes.into_iter().map(JobNode::from).collect(),
            index,
            pending_edges: Vec::new(),
            stopped: record.stopped,
            graph_config: GraphConfig::default(),
            logger_builder,
        })
    }

    pub fn from_json(json: &str, registry: &Registry) -> GraphResult<Self> {
        let record: WorkflowRecord = serde_json::from_str(json)?;
        Self::from_record(record, registry)
    }
}
