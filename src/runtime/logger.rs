/// Per-job logger factory
///
/// The workflow holds one `LoggerBuilder` and hands every job run a
/// `JobLogger` built from it. Builders are identified by name so the choice
/// survives serialization.

use crate::workflow::{JobNode, Workflow};
use std::{fmt, sync::Arc};
use tracing::Span;

/// Strategy that builds the logger a job run writes to
pub trait LoggerBuilder: Send + Sync + fmt::Debug {
    /// Identifier stored in the workflow record
    fn name(&self) -> &str;

    /// Build a logger for one run of `job_name`
    fn build(&self, job_name: &str, run_id: &str) -> JobLogger;
}

/// Logger bound to one job run
#[derive(Debug, Clone)]
pub struct JobLogger {
    job: String,
    run_id: String,
    span: Span,
}

impl JobLogger {
    pub fn new(job: impl Into<String>, run_id: impl Into<String>, span: Span) -> Self {
        Self {
            job: job.into(),
            run_id: run_id.into(),
            span,
        }
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn info(&self, message: &str) {
        self.span.in_scope(|| tracing::info!("{}", message));
    }

    pub fn warn(&self, message: &str) {
        self.span.in_scope(|| tracing::warn!("{}", message));
    }

    pub fn error(&self, message: &str) {
        self.span.in_scope(|| tracing::error!("{}", message));
    }
}

/// Default builder: a `tracing` span carrying the job name and run id
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLoggerBuilder;

impl TracingLoggerBuilder {
    pub const NAME: &'static str = "TracingLoggerBuilder";
}

impl LoggerBuilder for TracingLoggerBuilder {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build(&self, job_name: &str, run_id: &str) -> JobLogger {
        let span = tracing::info_span!("job", job = %job_name, jid = %run_id);
        JobLogger::new(job_name, run_id, span)
    }
}

impl Workflow {
    /// Swap the logger factory used for this workflow's jobs
    pub fn set_logger_builder(&mut self, builder: Arc<dyn LoggerBuilder>) {
        tracing::debug!("🪵 Workflow '{}' logger builder: {}", self.id, builder.name());
        self.logger_builder = builder;
    }

    pub fn logger_builder(&self) -> &Arc<dyn LoggerBuilder> {
        &self.logger_builder
    }

    /// Build the logger for one run of `job`
    pub fn build_logger_for_job(&self, job: &JobNode, run_id: &str) -> JobLogger {
        self.logger_builder.build(job.name(), run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::RunOptions;

    #[derive(Debug)]
    struct QuietBuilder;

    impl LoggerBuilder for QuietBuilder {
        fn name(&self) -> &str {
            "QuietBuilder"
        }

        fn build(&self, job_name: &str, run_id: &str) -> JobLogger {
            JobLogger::new(job_name, run_id, Span::none())
        }
    }

    #[test]
    fn workflow_defaults_to_tracing_builder() {
        let flow = Workflow::new("workflow");
        assert_eq!(flow.logger_builder().name(), TracingLoggerBuilder::NAME);
    }

    #[test]
    fn builds_logger_through_configured_builder() {
        let mut flow = Workflow::new("workflow");
        flow.run("a-job", RunOptions::new()).unwrap();
        flow.set_logger_builder(Arc::new(QuietBuilder));
        assert_eq!(flow.logger_builder().name(), "QuietBuilder");

        let job = flow.find_job("a-job").unwrap();
        let logger = flow.build_logger_for_job(job, "jid-1");
        assert_eq!(logger.job(), "a-job");
        assert_eq!(logger.run_id(), "jid-1");
        assert!(logger.span().is_none());
        logger.info("quiet");
    }
}
