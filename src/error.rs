//! Error types shared by the retention engine.
//!
//! Setup errors (`Configuration`, `UnknownJobType`, `InvalidParameter`) are
//! raised before a job touches the filesystem. Per-file deletion failures are
//! not errors at all; they are counted in the job report.

use std::path::PathBuf;
use thiserror::Error;

/// A job parameter that is missing, malformed or inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("field '{0}' needs to be defined")]
    Missing(&'static str),

    #[error("either 'match' or 'older' needs to be defined")]
    Unconstrained,

    #[error("invalid age expression '{0}', expected <number>[d|w|m|y]")]
    InvalidAge(String),

    #[error("field '{field}' must be a non-negative integer, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },

    #[error("field '{field}' must be true or false, got '{value}'")]
    NotABoolean { field: &'static str, value: String },

    #[error("field '{0}' must be a string")]
    NotText(&'static str),

    #[error("invalid match pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("unknown entry kind '{0}', expected file, dir or link")]
    InvalidKind(String),

    #[error("invalid root expression '{expression}': {reason}")]
    InvalidRoot { expression: String, reason: String },

    #[error("root expression '{0}' matches nothing")]
    NoRoots(String),

    #[error("root {} needs to be an existing directory", .0.display())]
    NotADirectory(PathBuf),
}

/// The traversal capability failed while walking a root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to enumerate {}: {reason}", .root.display())]
pub struct EnumerationError {
    pub root: PathBuf,
    pub reason: String,
}

impl EnumerationError {
    pub fn new(root: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            root: root.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors that end a job, and depending on the failure policy, the run.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("{job}: {source}")]
    Configuration {
        job: String,
        #[source]
        source: ParamError,
    },

    #[error("{job}: no such type definition: '{tag}'")]
    UnknownJobType { job: String, tag: String },

    #[error("{job}: invalid field '{field}' in job definition for job type {variant}")]
    InvalidParameter {
        job: String,
        field: String,
        variant: &'static str,
    },

    #[error("{job}: {source}")]
    Enumeration {
        job: String,
        #[source]
        source: EnumerationError,
    },
}

impl JobError {
    pub fn configuration(job: &str, source: ParamError) -> Self {
        JobError::Configuration {
            job: job.to_string(),
            source,
        }
    }

    pub fn enumeration(job: &str, source: EnumerationError) -> Self {
        JobError::Enumeration {
            job: job.to_string(),
            source,
        }
    }

    /// Name of the job the error belongs to.
    pub fn job(&self) -> &str {
        match self {
            JobError::Configuration { job, .. }
            | JobError::UnknownJobType { job, .. }
            | JobError::InvalidParameter { job, .. }
            | JobError::Enumeration { job, .. } => job,
        }
    }

    /// True for errors raised while setting a job up, before any mutation.
    pub fn is_setup_error(&self) -> bool {
        !matches!(self, JobError::Enumeration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_job_and_field() {
        let err = JobError::InvalidParameter {
            job: "logs".to_string(),
            field: "size".to_string(),
            variant: "PruneJob",
        };
        assert_eq!(
            err.to_string(),
            "logs: invalid field 'size' in job definition for job type PruneJob"
        );
        assert!(err.is_setup_error());

        let err = JobError::configuration("logs", ParamError::Unconstrained);
        assert_eq!(
            err.to_string(),
            "logs: either 'match' or 'older' needs to be defined"
        );
    }

    #[test]
    fn test_enumeration_is_not_setup_error() {
        let err = JobError::enumeration("logs", EnumerationError::new("/var/log", "denied"));
        assert_eq!(err.job(), "logs");
        assert!(!err.is_setup_error());
        assert_eq!(err.to_string(), "logs: failed to enumerate /var/log: denied");
    }
}
