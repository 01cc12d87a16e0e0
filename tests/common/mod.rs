// Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use housekeeper::{JobConfig, JobSet};

const DAY: u64 = 24 * 60 * 60;

/// Create `name` under `dir` with a modification time `days` in the past.
pub fn file_aged(dir: &Path, name: &str, days: u64) -> PathBuf {
    file_aged_secs(dir, name, days * DAY)
}

/// Same as [`file_aged`] with second precision, for distinct mtimes.
pub fn file_aged_secs(dir: &Path, name: &str, secs: u64) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, name.as_bytes()).unwrap();
    let mtime = SystemTime::now() - Duration::from_secs(secs);
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
    path
}

/// Snapshot of a tree: relative path -> (size, mtime).
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, (u64, SystemTime)> {
    let mut entries = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let entry = entry.unwrap();
            let metadata = fs::symlink_metadata(entry.path()).unwrap();
            if metadata.is_dir() {
                pending.push(entry.path());
            }
            entries.insert(
                entry.path().strip_prefix(root).unwrap().to_path_buf(),
                (metadata.len(), metadata.modified().unwrap()),
            );
        }
    }
    entries
}

pub fn root_of(dir: &Path) -> String {
    dir.display().to_string()
}

pub fn single_job(name: &str, config: JobConfig) -> JobSet {
    [(name, config)].into_iter().collect()
}
