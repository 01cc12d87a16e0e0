//! Job model.
//!
//! A job pairs resolved roots with retention criteria. Variants differ only
//! in how they turn the enumerated candidates of a root into a deletion set
//! ([`Job::select`]); reporting and deleting are shared, so a dry run and a
//! real run always act on the same selection.

pub mod prune;
pub mod registry;
pub mod retain;

pub use prune::PruneJob;
pub use registry::{JobRegistry, JobSpec, DEFAULT_JOB_TYPE};
pub use retain::RetainNewestJob;

use std::cmp::Reverse;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::enumerator::FileEnumerator;
use crate::error::{EnumerationError, JobError, ParamError};
use crate::fs::{Candidate, RemoveOutcome, Traversal};
use crate::output::Output;
use crate::params::JobConfig;
use crate::retention::{resolve_roots, Criteria, EntryKind};

/// Whether a run only reports or actually deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    DryRun,
    Execute,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::DryRun => write!(f, "noop"),
            Mode::Execute => write!(f, "run"),
        }
    }
}

/// State shared by every variant: name, roots, criteria and run mode.
#[derive(Debug, Clone)]
pub struct JobBase {
    name: String,
    roots: Vec<PathBuf>,
    criteria: Criteria,
    mode: Mode,
}

impl JobBase {
    /// Resolve roots and criteria from a merged, validated config.
    pub fn from_config(
        name: &str,
        config: &JobConfig,
        require_constraint: bool,
        mode: Mode,
    ) -> Result<Self, JobError> {
        let setup = || -> Result<Self, ParamError> {
            let expressions = config.text_list("root")?.ok_or(ParamError::Missing("root"))?;
            let roots = resolve_roots(&expressions)?;
            let criteria = Criteria::from_config(config, require_constraint)?;
            Ok(Self {
                name: name.to_string(),
                roots,
                criteria,
                mode,
            })
        };
        setup().map_err(|e| JobError::configuration(name, e))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// Outcome of one job pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    pub job: String,
    pub mode: Mode,
    /// Every path in the deletion set, in processing order.
    pub selected: Vec<PathBuf>,
    pub selected_bytes: u64,
    pub removed: usize,
    /// Already gone when we tried to remove them.
    pub missing: usize,
    pub failed: usize,
}

impl JobReport {
    fn new(job: &str, mode: Mode) -> Self {
        Self {
            job: job.to_string(),
            mode,
            ..Default::default()
        }
    }

    fn record(&mut self, candidate: &Candidate) {
        self.selected.push(candidate.path.clone());
        self.selected_bytes += candidate.size;
    }

    fn summary(&self) -> String {
        let size = humansize::format_size(self.selected_bytes, humansize::BINARY);
        match self.mode {
            Mode::DryRun => format!(
                "{}: would remove {} entries ({})",
                self.job,
                self.selected.len(),
                size
            ),
            Mode::Execute => format!(
                "{}: removed {} of {} entries ({}), {} already gone, {} failed",
                self.job,
                self.removed,
                self.selected.len(),
                size,
                self.missing,
                self.failed
            ),
        }
    }
}

/// Reorder a selection so every directory follows the entries below it,
/// the order `find -delete` removes in. Selections without directories keep
/// their order.
fn children_first(selection: &mut [Candidate]) {
    if selection.iter().any(|c| c.kind == EntryKind::Dir) {
        selection.sort_by_key(|c| Reverse(c.path.components().count()));
    }
}

/// Capability shared by all job variants.
pub trait Job {
    fn base(&self) -> &JobBase;

    /// Variant name used in messages.
    fn variant(&self) -> &'static str;

    /// Parameters this variant accepts.
    fn parameters(&self) -> &'static [&'static str];

    /// Deletion set for one root.
    fn select(
        &self,
        root: &Path,
        enumerator: &FileEnumerator<'_>,
    ) -> Result<Vec<Candidate>, EnumerationError>;

    fn name(&self) -> &str {
        self.base().name()
    }

    /// Deletion set for one root, in removal order.
    fn plan(
        &self,
        root: &Path,
        enumerator: &FileEnumerator<'_>,
    ) -> Result<Vec<Candidate>, EnumerationError> {
        let mut selection = self.select(root, enumerator)?;
        children_first(&mut selection);
        Ok(selection)
    }

    /// Run in the mode chosen at construction.
    fn run(&self, traversal: &dyn Traversal, out: &mut Output) -> Result<JobReport, JobError> {
        match self.base().mode() {
            Mode::DryRun => self.report(traversal, out),
            Mode::Execute => self.execute(traversal, out),
        }
    }

    /// List the deletion set without touching the filesystem.
    fn report(&self, traversal: &dyn Traversal, out: &mut Output) -> Result<JobReport, JobError> {
        let base = self.base();
        let enumerator = FileEnumerator::new(traversal, base.criteria());
        let mut report = JobReport::new(base.name(), Mode::DryRun);

        for root in base.roots() {
            out.line(format_args!(
                "{}: execute command: {}",
                base.name(),
                base.criteria().describe(root)
            ));
            let selection = self
                .plan(root, &enumerator)
                .map_err(|e| JobError::enumeration(base.name(), e))?;

            for candidate in &selection {
                out.line(format_args!(
                    "{}: would remove: {}",
                    base.name(),
                    candidate.path.display()
                ));
                report.record(candidate);
            }
        }

        out.line(report.summary());
        Ok(report)
    }

    /// Delete the deletion set, best-effort per entry.
    fn execute(&self, traversal: &dyn Traversal, out: &mut Output) -> Result<JobReport, JobError> {
        let base = self.base();
        let enumerator = FileEnumerator::new(traversal, base.criteria());
        let mut report = JobReport::new(base.name(), Mode::Execute);

        for root in base.roots() {
            out.line(format_args!(
                "{}: execute command: {} -delete (do not copy-paste this command)",
                base.name(),
                base.criteria().describe(root)
            ));
            let selection = self
                .plan(root, &enumerator)
                .map_err(|e| JobError::enumeration(base.name(), e))?;

            for candidate in &selection {
                report.record(candidate);
                match traversal.remove(candidate) {
                    RemoveOutcome::Removed => {
                        tracing::debug!(job = base.name(), path = %candidate.path.display(), "Removed");
                        report.removed += 1;
                    }
                    RemoveOutcome::Missing => {
                        tracing::debug!(job = base.name(), path = %candidate.path.display(), "Already gone");
                        report.missing += 1;
                    }
                    RemoveOutcome::Failed(err) => {
                        tracing::warn!(
                            job = base.name(),
                            path = %candidate.path.display(),
                            error = %err,
                            "Failed to remove"
                        );
                        report.failed += 1;
                    }
                }
            }
        }

        out.line(report.summary());
        Ok(report)
    }
}

impl fmt::Debug for dyn Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.variant())
            .field("name", &self.name())
            .field("roots", &self.base().roots())
            .finish()
    }
}
