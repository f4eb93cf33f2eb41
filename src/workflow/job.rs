/// Job node: one vertex of the workflow graph and its execution state
///
/// A node knows its neighbors only by name. Lookups of sibling nodes always go
/// through the owning workflow, so nodes never point back at it.

use chrono::{DateTime, Utc};

/// A single unit of work inside a workflow
#[derive(Debug, Clone, PartialEq)]
pub struct JobNode {
    /// Unique name within the workflow
    pub(crate) name: String,
    /// Logical job kind, used to dispatch to a registered handler
    pub(crate) job_type: String,
    /// Names of nodes that must finish before this one may run
    pub(crate) incoming: Vec<String>,
    /// Names of nodes that depend on this one
    pub(crate) outgoing: Vec<String>,
    pub(crate) enqueued: bool,
    pub(crate) running: bool,
    pub(crate) finished: bool,
    pub(crate) failed: bool,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) finished_at: Option<DateTime<Utc>>,
    pub(crate) failed_at: Option<DateTime<Utc>>,
}

impl JobNode {
    /// Create a pending node with no edges
    pub fn new(name: impl Into<String>, job_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job_type: job_type.into(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
            enqueued: false,
            running: false,
            finished: false,
            failed: false,
            started_at: None,
            finished_at: None,
            failed_at: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    pub fn incoming(&self) -> &[String] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[String] {
        &self.outgoing
    }

    pub fn is_enqueued(&self) -> bool {
        self.enqueued
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn failed_at(&self) -> Option<DateTime<Utc>> {
        self.failed_at
    }

    /// Finished or failed
    pub fn is_terminal(&self) -> bool {
        self.finished || self.failed
    }

    /// Enqueued or running
    pub fn is_in_flight(&self) -> bool {
        self.enqueued || self.running
    }

    /// Finished without failing
    pub fn succeeded(&self) -> bool {
        self.finished && !self.failed
    }

    /// Has been picked up by a worker at some point
    pub fn started(&self) -> bool {
        self.started_at.is_some()
    }

    /// No upstream jobs at all
    pub fn has_no_dependencies(&self) -> bool {
        self.incoming.is_empty()
    }

    /// Mark the job as handed to the queue backend
    ///
    /// Ignored for a job that is already running, so a late or duplicate
    /// enqueue event never leaves both in-flight flags set.
    pub fn mark_enqueued(&mut self) {
        if self.reject_if_terminal("enqueue") {
            return;
        }
        if self.running {
            tracing::warn!("⚠️ Ignoring enqueue for job '{}': already running", self.name);
            return;
        }
        self.enqueued = true;
        tracing::debug!("📥 Job '{}' enqueued", self.name);
    }

    /// Mark the job as picked up by a worker
    pub fn mark_running(&mut self) {
        if self.reject_if_terminal("start") {
            return;
        }
        self.enqueued = false;
        self.running = true;
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        tracing::debug!("▶️ Job '{}' running", self.name);
    }

    /// Mark the job as completed successfully
    pub fn mark_finished(&mut self) {
        if self.reject_if_terminal("finish") {
            return;
        }
        self.enqueued = false;
        self.running = false;
        self.finished = true;
        self.finished_at = Some(Utc::now());
        tracing::debug!("✅ Job '{}' finished", self.name);
    }

    /// Mark the job as failed
    pub fn mark_failed(&mut self) {
        if self.reject_if_terminal("fail") {
            return;
        }
        self.enqueued = false;
        self.running = false;
        self.failed = true;
        self.failed_at = Some(Utc::now());
        tracing::debug!("❌ Job '{}' failed", self.name);
    }

    /// Whether this job can be handed to the queue now
    ///
    /// True when the job is idle (not terminal, not in flight) and every
    /// incoming name resolves to a finished job. A name the resolver does not
    /// know counts as unfinished. A failed ancestor never becomes finished, so
    /// its descendants stay excluded without any extra check here.
    pub fn is_ready<'a, F>(&self, resolve: F) -> bool
    where
        F: Fn(&str) -> Option<&'a JobNode>,
    {
        if self.is_terminal() || self.is_in_flight() {
            return false;
        }

        self.incoming
            .iter()
            .all(|name| resolve(name).is_some_and(|parent| parent.finished))
    }

    fn reject_if_terminal(&self, transition: &str) -> bool {
        if self.is_terminal() {
            tracing::warn!(
                "⚠️ Ignoring {} for job '{}': already {}",
                transition,
                self.name,
                if self.finished { "finished" } else { "failed" }
            );
            return true;
        }
        false
    }
}
