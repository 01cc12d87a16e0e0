//! Job file discovery and loading.
//!
//! Job definitions live either in a directory of files (default
//! `/etc/housekeeper`) or in a single file. Each file maps job names to
//! job parameters:
//!
//! ```yaml
//! tmp-logs:
//!   root: /var/tmp/app
//!   match: "*.log"
//!   older: 2w
//! ```
//!
//! ```ini
//! [tmp-logs]
//! root = /var/tmp/app
//! match = *.log
//! older = 2w
//! ```
//!
//! YAML, INI and TOML are supported; the format follows the file extension.
//! Jobs keep the order in which they appear, and a job redefined by a later
//! file replaces the earlier definition in place.

use config::{FileFormat, Format};
use std::error::Error as StdError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::output::Output;
use crate::params::{JobConfig, JobSet};

pub const DEFAULT_CONFIG_DIR: &str = "/etc/housekeeper";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid config argument '{}', must be a file or directory", .0.display())]
    InvalidLocation(PathBuf),

    #[error("Failed to list config directory {}: {reason}", .path.display())]
    ListDir { path: PathBuf, reason: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("{}: job '{job}' is not a table of parameters: {source}", .path.display())]
    InvalidJob {
        path: PathBuf,
        job: String,
        #[source]
        source: config::ConfigError,
    },
}

/// Where job definitions are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    Dir(PathBuf),
    File(PathBuf),
}

impl Default for ConfigLocation {
    fn default() -> Self {
        ConfigLocation::Dir(PathBuf::from(DEFAULT_CONFIG_DIR))
    }
}

impl ConfigLocation {
    /// Interpret a `--config` argument. Without one, the default directory
    /// is used.
    pub fn from_arg(arg: Option<&Path>) -> Result<Self, SourceError> {
        let Some(path) = arg else {
            return Ok(Self::default());
        };
        if path.is_dir() {
            Ok(ConfigLocation::Dir(path.to_path_buf()))
        } else if path.is_file() || path.is_symlink() {
            Ok(ConfigLocation::File(path.to_path_buf()))
        } else {
            Err(SourceError::InvalidLocation(path.to_path_buf()))
        }
    }
}

/// Pick the parser for a job file from its extension.
pub fn format_for(path: &Path) -> Option<FileFormat> {
    match path.extension()?.to_str()? {
        "yaml" | "yml" => Some(FileFormat::Yaml),
        "ini" => Some(FileFormat::Ini),
        "toml" => Some(FileFormat::Toml),
        _ => None,
    }
}

/// List candidate job files, sorted by name. Hidden files are ignored.
pub fn discover(location: &ConfigLocation) -> Result<Vec<PathBuf>, SourceError> {
    let dir = match location {
        ConfigLocation::File(path) => return Ok(vec![path.clone()]),
        ConfigLocation::Dir(dir) => dir,
    };
    tracing::debug!("Looking for config files at {}", dir.display());

    let list_error = |reason: String| SourceError::ListDir {
        path: dir.clone(),
        reason,
    };
    let pattern = format!("{}/*", glob::Pattern::escape(&dir.to_string_lossy()));
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options).map_err(|e| list_error(e.to_string()))? {
        files.push(entry.map_err(|e| list_error(e.to_string()))?);
    }
    files.sort();

    tracing::debug!("Found {} config files", files.len());
    Ok(files)
}

/// Parse one job file.
///
/// The format's top-level table is read as-is, so job names containing
/// dots (`[nginx.logs]`) stay single names instead of nested paths.
pub fn load_file(path: &Path, format: FileFormat) -> Result<JobSet, SourceError> {
    tracing::info!("Reading config file {}", path.display());

    let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut jobs = JobSet::new();
    if text.trim().is_empty() {
        return Ok(jobs);
    }

    let uri = path.display().to_string();
    let table = Format::parse(&format, Some(&uri), &text).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    for (name, value) in table {
        let config = value
            .try_deserialize::<JobConfig>()
            .map_err(|source| SourceError::InvalidJob {
                path: path.to_path_buf(),
                job: name.clone(),
                source,
            })?;
        jobs.insert(name, config);
    }
    Ok(jobs)
}

/// Load every job file at `location` into one job set.
///
/// Directories, editor backups (`*~`) and files with unknown extensions are
/// skipped; the latter are mentioned on the output channel.
pub fn load(location: &ConfigLocation, out: &mut Output) -> Result<JobSet, SourceError> {
    let mut jobs = JobSet::new();

    for path in discover(location)? {
        if !path.is_file() {
            tracing::debug!("Config file '{}' is not a file, ignoring it", path.display());
            continue;
        }
        if path.to_string_lossy().ends_with('~') {
            tracing::debug!("Ignore config file '{}'", path.display());
            continue;
        }
        let Some(format) = format_for(&path) else {
            out.line(format_args!("unrecognized config file {}", path.display()));
            continue;
        };
        jobs.extend(load_file(&path, format)?);
    }

    Ok(jobs)
}
