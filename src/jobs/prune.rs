use std::path::Path;

use crate::enumerator::FileEnumerator;
use crate::error::{EnumerationError, JobError};
use crate::fs::Candidate;
use crate::jobs::{Job, JobBase, Mode};
use crate::params::JobConfig;

/// Removes every entry matched by the job's criteria.
#[derive(Debug, Clone)]
pub struct PruneJob {
    base: JobBase,
}

impl PruneJob {
    pub const VARIANT: &'static str = "PruneJob";
    pub const PARAMETERS: &'static [&'static str] =
        &["depth", "kind", "match", "older", "recurse", "root"];

    /// Build from a merged config. Without `match` or `older` the criteria
    /// would select everything under the roots, so one of them is required.
    pub fn new(name: &str, config: &JobConfig, mode: Mode) -> Result<Self, JobError> {
        Ok(Self {
            base: JobBase::from_config(name, config, true, mode)?,
        })
    }
}

impl Job for PruneJob {
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
        enumerator.enumerate(root)
    }
}
