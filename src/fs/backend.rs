use std::path::Path;

use crate::error::EnumerationError;
use crate::fs::types::{Candidate, RemoveOutcome};
use crate::retention::Criteria;

/// Filesystem capability the jobs run against.
///
/// Walking is read-only. Removal is best-effort and reports its outcome
/// instead of failing, so one stubborn file never stops a pass.
pub trait Traversal {
    /// Walk `root` and return every entry admitted by `criteria`, in the
    /// traversal's own order. The root itself is never returned.
    fn walk(&self, root: &Path, criteria: &Criteria) -> Result<Vec<Candidate>, EnumerationError>;

    /// Remove a single entry. Directories are removed only when empty.
    fn remove(&self, candidate: &Candidate) -> RemoveOutcome;

    /// Short name for logs.
    fn name(&self) -> &'static str {
        "traversal"
    }
}
