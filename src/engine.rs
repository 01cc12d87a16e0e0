//! Run orchestration.
//!
//! One pass over every configured job, in configuration order: resolve the
//! variant, merge defaults, validate fields, construct, then report or
//! execute. Setup always finishes before a job touches the filesystem.

use crate::error::JobError;
use crate::fs::{LocalFs, Traversal};
use crate::jobs::{JobRegistry, JobReport, Mode};
use crate::output::Output;
use crate::params::{JobConfig, JobSet};

/// What happens to the rest of the run when a job fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing job.
    #[default]
    Abort,
    /// Log the failure and carry on with the next job.
    Continue,
}

/// Settings fixed for the whole run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub mode: Mode,
    pub failure_policy: FailurePolicy,
}

impl RunOptions {
    pub fn dry_run() -> Self {
        Self::default()
    }

    pub fn execute() -> Self {
        Self {
            mode: Mode::Execute,
            ..Self::default()
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// A job that did not complete under [`FailurePolicy::Continue`].
#[derive(Debug)]
pub struct FailedJob {
    pub job: String,
    pub error: JobError,
}

/// Result of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<JobReport>,
    pub failures: Vec<FailedJob>,
}

impl RunSummary {
    pub fn report(&self, job: &str) -> Option<&JobReport> {
        self.reports.iter().find(|report| report.job == job)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Engine {
    registry: JobRegistry,
    traversal: Box<dyn Traversal>,
    options: RunOptions,
}

impl Engine {
    /// Engine over the local filesystem with the built-in job types.
    pub fn new(options: RunOptions) -> Self {
        Self::with_parts(JobRegistry::standard(), Box::new(LocalFs::new()), options)
    }

    pub fn with_parts(
        registry: JobRegistry,
        traversal: Box<dyn Traversal>,
        options: RunOptions,
    ) -> Self {
        Self {
            registry,
            traversal,
            options,
        }
    }

    pub fn run(&self, jobs: &JobSet, out: &mut Output) -> Result<RunSummary, JobError> {
        let mut summary = RunSummary::default();

        if jobs.is_empty() {
            out.line("No configuration loaded, exiting");
            return Ok(summary);
        }

        tracing::info!(
            jobs = jobs.len(),
            mode = %self.options.mode,
            "Starting run"
        );

        for (name, config) in jobs.iter() {
            match self.run_job(name, config, out) {
                Ok(report) => summary.reports.push(report),
                Err(error) => match self.options.failure_policy {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::Continue => {
                        tracing::warn!(job = name, error = %error, "Job failed, continuing");
                        out.line(&error);
                        summary.failures.push(FailedJob {
                            job: name.to_string(),
                            error,
                        });
                    }
                },
            }
        }

        Ok(summary)
    }

    fn run_job(
        &self,
        name: &str,
        config: &JobConfig,
        out: &mut Output,
    ) -> Result<JobReport, JobError> {
        let job = self.registry.instantiate(name, config, self.options.mode)?;

        match self.options.mode {
            Mode::DryRun => out.line(format_args!("Executing job {} (noop)", name)),
            Mode::Execute => out.line(format_args!("Executing job {}", name)),
        }

        job.run(self.traversal.as_ref(), out)
    }
}
