use std::path::Path;

use crate::enumerator::FileEnumerator;
use crate::error::{EnumerationError, JobError, ParamError};
use crate::fs::Candidate;
use crate::jobs::{Job, JobBase, Mode};
use crate::params::JobConfig;

/// Keeps the `keep` most recently modified matches of each root and removes
/// the rest.
#[derive(Debug, Clone)]
pub struct RetainNewestJob {
    base: JobBase,
    keep: usize,
}

impl RetainNewestJob {
    pub const VARIANT: &'static str = "RetainNewestJob";
    pub const PARAMETERS: &'static [&'static str] =
        &["depth", "keep", "kind", "match", "older", "recurse", "root"];

    pub fn new(name: &str, config: &JobConfig, mode: Mode) -> Result<Self, JobError> {
        let keep = config
            .unsigned("keep")
            .and_then(|keep| keep.ok_or(ParamError::Missing("keep")))
            .map_err(|e| JobError::configuration(name, e))?;

        Ok(Self {
            base: JobBase::from_config(name, config, false, mode)?,
            keep,
        })
    }

    pub fn keep(&self) -> usize {
        self.keep
    }

    /// Everything except the `keep` newest entries, oldest first.
    pub fn deletion_set(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(|a, b| a.age_key().cmp(&b.age_key()));
        let cut = candidates.len().saturating_sub(self.keep);
        candidates.truncate(cut);
        candidates
    }
}

impl Job for RetainNewestJob {
    fn base(&self) -> &JobBase {
        &self.base
    }

    fn variant(&self) -> &'static str {
        Self::VARIANT
    }

    fn parameters(&self) -> &'static [&'static str] {
        Self::PARAMETERS
    }

    fn select(
        &self,
        root: &Path,
        enumerator: &FileEnumerator<'_>,
    ) -> Result<Vec<Candidate>, EnumerationError> {
        let candidates = enumerator.enumerate(root)?;
        let total = candidates.len();
        let selection = self.deletion_set(candidates);
        tracing::debug!(
            job = self.name(),
            root = %root.display(),
            total,
            keep = self.keep,
            delete = selection.len(),
            "Selected oldest entries"
        );
        Ok(selection)
    }
}
