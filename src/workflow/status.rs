/// Workflow-level status derived from job states

use crate::workflow::types::Workflow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display status of a whole workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStatus {
    Pending,
    Running,
    Stopped,
    Finished,
    Failed,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Stopped => "Stopped",
            Self::Finished => "Finished",
            Self::Failed => "Failed",
        };
        f.write_str(label)
    }
}

impl Workflow {
    /// Any job failed
    pub fn failed(&self) -> bool {
        self.nodes.iter().any(|n| n.failed)
    }

    /// Any job enqueued or running
    pub fn running(&self) -> bool {
        self.nodes.iter().any(|n| n.is_in_flight())
    }

    /// Every job finished. An empty workflow is not finished.
    pub fn finished(&self) -> bool {
        !self.nodes.is_empty() && self.nodes.iter().all(|n| n.finished)
    }

    /// Any job was picked up by a worker
    pub fn started(&self) -> bool {
        self.nodes.iter().any(|n| n.started())
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Pause: the runtime should not enqueue more jobs
    pub fn stop(&mut self) {
        self.stopped = true;
        tracing::debug!("⏸️ Workflow '{}' stopped", self.id);
    }

    /// Resume after `stop`
    pub fn start(&mut self) {
        self.stopped = false;
        tracing::debug!("▶️ Workflow '{}' resumed", self.id);
    }

    /// Current display status; failure wins over completion, completion over activity
    pub fn status(&self) -> WorkflowStatus {
        if self.failed() {
            WorkflowStatus::Failed
        } else if self.finished() {
            WorkflowStatus::Finished
        } else if self.running() {
            WorkflowStatus::Running
        } else if self.stopped {
            WorkflowStatus::Stopped
        } else {
            WorkflowStatus::Pending
        }
    }

    /// Earliest job start
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.nodes.iter().filter_map(|n| n.started_at).min()
    }

    /// Latest job completion, once every job finished
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        if !self.finished() {
            return None;
        }
        self.nodes.iter().filter_map(|n| n.finished_at).max()
    }
}

#[cfg(test)]
mod tests {
    use crate::workflow::{RunOptions, Workflow, WorkflowStatus};

    fn flow() -> Workflow {
        let mut flow = Workflow::new("status");
        flow.run("Prepare", RunOptions::new()).unwrap();
        flow.run("Fetch", RunOptions::new()).unwrap();
        flow.create_dependencies().unwrap();
        flow
    }

    #[test]
    fn new_workflow_is_pending() {
        let flow = flow();
        assert_eq!(flow.status(), WorkflowStatus::Pending);
        assert_eq!(flow.status().to_string(), "Pending");
        assert!(!flow.failed());
        assert!(!flow.running());
        assert!(!flow.finished());
        assert!(flow.started_at().is_none());
    }

    #[test]
    fn enqueued_or_running_jobs_mean_running() {
        let mut flow = flow();
        flow.mark_enqueued("Prepare").unwrap();
        assert!(flow.running());
        assert_eq!(flow.status(), WorkflowStatus::Running);

        flow.mark_running("Prepare").unwrap();
        assert!(flow.running());
        assert!(flow.started());
        assert!(flow.started_at().is_some());
    }

    #[test]
    fn one_failed_job_fails_the_workflow() {
        let mut flow = flow();
        flow.mark_enqueued("Fetch").unwrap();
        flow.mark_failed("Prepare").unwrap();
        assert!(flow.failed());
        assert_eq!(flow.status(), WorkflowStatus::Failed);
    }

    #[test]
    fn finished_once_every_job_finished() {
        let mut flow = flow();
        flow.mark_finished("Prepare").unwrap();
        assert!(!flow.finished());
        assert!(flow.finished_at().is_none());

        flow.mark_finished("Fetch").unwrap();
        assert!(flow.finished());
        assert_eq!(flow.status(), WorkflowStatus::Finished);
        assert_eq!(flow.finished_at(), flow.find_job("Fetch").unwrap().finished_at());
    }

    #[test]
    fn empty_workflow_is_not_finished() {
        assert!(!Workflow::new("empty").finished());
    }

    #[test]
    fn stop_and_start_only_toggle_the_flag() {
        let mut flow = flow();
        let before = flow.nodes().to_vec();

        assert!(!flow.is_stopped());
        flow.stop();
        assert!(flow.is_stopped());
        assert_eq!(flow.status(), WorkflowStatus::Stopped);
        flow.start();
        assert!(!flow.is_stopped());

        assert_eq!(flow.nodes(), before.as_slice());
    }
}
