use chrono::{DateTime, Utc};
use std::io;
use std::path::PathBuf;

use crate::retention::EntryKind;

/// An entry selected by a traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

impl Candidate {
    /// Ordering key for "newest last" selection; ties fall back to the path.
    pub fn age_key(&self) -> (DateTime<Utc>, &PathBuf) {
        (self.modified, &self.path)
    }
}

/// Result of a single best-effort deletion.
#[derive(Debug)]
pub enum RemoveOutcome {
    Removed,
    /// The entry vanished before we got to it.
    Missing,
    Failed(io::Error),
}

impl RemoveOutcome {
    pub fn from_io(result: io::Result<()>) -> Self {
        match result {
            Ok(()) => RemoveOutcome::Removed,
            Err(e) if e.kind() == io::ErrorKind::NotFound => RemoveOutcome::Missing,
            Err(e) => RemoveOutcome::Failed(e),
        }
    }
}
