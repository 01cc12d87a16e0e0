use chrono::{DateTime, Utc};
use jwalk::{Parallelism, WalkDir};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::EnumerationError;
use crate::fs::backend::Traversal;
use crate::fs::types::{Candidate, RemoveOutcome};
use crate::retention::{Criteria, DepthLimit, EntryKind};

/// Local filesystem traversal backed by jwalk.
///
/// Walks serially in sorted order so repeated runs over an unchanged tree
/// see entries in the same order. Symlinks are never followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    fn entry_kind(file_type: &fs::FileType) -> Option<EntryKind> {
        if file_type.is_symlink() {
            Some(EntryKind::Link)
        } else if file_type.is_dir() {
            Some(EntryKind::Dir)
        } else if file_type.is_file() {
            Some(EntryKind::File)
        } else {
            // sockets, fifos, devices
            None
        }
    }
}

fn stat_error(root: &Path, path: &Path, err: io::Error) -> EnumerationError {
    EnumerationError::new(root, format!("{}: {}", path.display(), err))
}

impl Traversal for LocalFs {
    fn walk(&self, root: &Path, criteria: &Criteria) -> Result<Vec<Candidate>, EnumerationError> {
        let now = Utc::now();
        let mut walker = WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(false)
            .sort(true);
        if let DepthLimit::Limited(depth) = criteria.max_depth() {
            walker = walker.max_depth(depth);
        }

        let mut candidates = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| EnumerationError::new(root, e))?;
            if entry.depth == 0 {
                continue;
            }

            let Some(kind) = Self::entry_kind(&entry.file_type()) else {
                continue;
            };

            let path = entry.path();
            let metadata = match fs::symlink_metadata(&path) {
                Ok(metadata) => metadata,
                // removed between readdir and stat
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(stat_error(root, &path, e)),
            };
            let modified: DateTime<Utc> = match metadata.modified() {
                Ok(time) => time.into(),
                Err(e) => return Err(stat_error(root, &path, e)),
            };

            if criteria.admits(&entry.file_name, kind, modified, now) {
                candidates.push(Candidate {
                    path,
                    kind,
                    size: metadata.len(),
                    modified,
                });
            }
        }

        tracing::debug!(
            root = %root.display(),
            matched = candidates.len(),
            "Walk complete"
        );
        Ok(candidates)
    }

    fn remove(&self, candidate: &Candidate) -> RemoveOutcome {
        let result = match candidate.kind {
            EntryKind::Dir => fs::remove_dir(&candidate.path),
            EntryKind::File | EntryKind::Link => fs::remove_file(&candidate.path),
        };
        RemoveOutcome::from_io(result)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
