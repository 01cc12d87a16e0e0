// File enumeration
// Runs one traversal of a root under a job's criteria

use std::path::Path;

use crate::error::EnumerationError;
use crate::fs::{Candidate, Traversal};
use crate::retention::Criteria;

/// Candidate enumeration for a single job.
///
/// Output order is whatever the traversal produces; variants that need a
/// particular order sort for themselves.
pub struct FileEnumerator<'a> {
    traversal: &'a dyn Traversal,
    criteria: &'a Criteria,
}

impl<'a> FileEnumerator<'a> {
    pub fn new(traversal: &'a dyn Traversal, criteria: &'a Criteria) -> Self {
        Self {
            traversal,
            criteria,
        }
    }

    /// Enumerate `root`, which must be an existing directory.
    pub fn enumerate(&self, root: &Path) -> Result<Vec<Candidate>, EnumerationError> {
        tracing::debug!(
            root = %root.display(),
            traversal = self.traversal.name(),
            command = %self.criteria.describe(root),
            "Enumerating"
        );
        self.traversal.walk(root, self.criteria)
    }
}
