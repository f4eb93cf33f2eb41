/// Job handler seam
///
/// The graph core never runs job logic. The surrounding runtime looks up a
/// handler by the job's type in the `Registry`, runs it, and reports the
/// outcome back with the node transitions.

use crate::runtime::logger::JobLogger;
use crate::workflow::JobNode;
use anyhow::Result;

/// Business logic for one job type
pub trait JobHandler: Send + Sync {
    /// Run the job. An `Err` is reported by the runtime as `mark_failed`.
    fn perform(&self, job: &JobNode, logger: &JobLogger) -> Result<()>;
}

impl<F> JobHandler for F
where
    F: Fn(&JobNode, &JobLogger) -> Result<()> + Send + Sync,
{
    fn perform(&self, job: &JobNode, logger: &JobLogger) -> Result<()> {
        self(job, logger)
    }
}
