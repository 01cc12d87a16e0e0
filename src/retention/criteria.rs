//! Retention criteria.
//!
//! Turns the declarative `match`, `older`, `depth`, `recurse` and `kind`
//! fields of a job into a normalized predicate the traversal layer can
//! evaluate. Nothing here touches the filesystem.

use chrono::{DateTime, Duration, Utc};
use globset::{GlobBuilder, GlobMatcher};
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ParamError;
use crate::params::{JobConfig, ParamValue};
use crate::retention::age::AgeThreshold;

/// How deep below a root the traversal may descend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthLimit {
    /// Depth relative to the root; 1 means immediate children only.
    Limited(usize),
    Unlimited,
}

/// Entry type a job operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
    #[default]
    File,
    Dir,
    Link,
}

impl EntryKind {
    /// Single-letter form used by `find -type`.
    pub fn find_flag(&self) -> &'static str {
        match self {
            EntryKind::File => "f",
            EntryKind::Dir => "d",
            EntryKind::Link => "l",
        }
    }
}

impl FromStr for EntryKind {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "f" => Ok(EntryKind::File),
            "dir" | "directory" | "d" => Ok(EntryKind::Dir),
            "link" | "symlink" | "l" => Ok(EntryKind::Link),
            _ => Err(ParamError::InvalidKind(s.to_string())),
        }
    }
}

/// Compiled filename pattern, matched against the entry's base name only.
#[derive(Debug, Clone)]
pub struct NamePattern {
    raw: String,
    matcher: GlobMatcher,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self, ParamError> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|e| ParamError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.kind().to_string(),
            })?;

        Ok(Self {
            raw: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_match(&self, file_name: &OsStr) -> bool {
        self.matcher.is_match(Path::new(file_name))
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

/// Normalized selection predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    max_depth: DepthLimit,
    name: Option<NamePattern>,
    min_age: Option<AgeThreshold>,
    kind: EntryKind,
}

impl Criteria {
    /// Build the predicate from a merged job config.
    ///
    /// `require_constraint` makes a config with neither `match` nor `older`
    /// an error; otherwise such a config would select every entry.
    pub fn from_config(config: &JobConfig, require_constraint: bool) -> Result<Self, ParamError> {
        let name = config
            .text("match")?
            .map(|pattern| NamePattern::new(&pattern))
            .transpose()?;

        let min_age = match config.get("older") {
            None => None,
            Some(ParamValue::Integer(days)) => Some(AgeThreshold::from_days(
                u32::try_from(*days).map_err(|_| ParamError::InvalidAge(days.to_string()))?,
            )),
            Some(ParamValue::Text(expr)) => Some(expr.parse::<AgeThreshold>()?),
            Some(other) => return Err(ParamError::InvalidAge(other.to_text())),
        };

        if require_constraint && name.is_none() && min_age.is_none() {
            return Err(ParamError::Unconstrained);
        }

        let max_depth = match (config.unsigned("depth")?, config.boolean("recurse")?) {
            (Some(depth), _) => DepthLimit::Limited(depth),
            (None, Some(false)) => DepthLimit::Limited(1),
            (None, _) => DepthLimit::Unlimited,
        };

        let kind = config
            .text("kind")?
            .map(|kind| kind.parse::<EntryKind>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            max_depth,
            name,
            min_age,
            kind,
        })
    }

    pub fn max_depth(&self) -> DepthLimit {
        self.max_depth
    }

    pub fn name_pattern(&self) -> Option<&NamePattern> {
        self.name.as_ref()
    }

    pub fn min_age(&self) -> Option<AgeThreshold> {
        self.min_age
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Decide whether an entry found by the traversal is selected.
    ///
    /// The age bound is inclusive: an entry exactly `min_age` days old
    /// matches. Depth is enforced by the traversal itself.
    pub fn admits(
        &self,
        file_name: &OsStr,
        kind: EntryKind,
        modified: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        if kind != self.kind {
            return false;
        }
        if let Some(pattern) = &self.name {
            if !pattern.is_match(file_name) {
                return false;
            }
        }
        if let Some(age) = self.min_age {
            if now.signed_duration_since(modified) < Duration::days(i64::from(age.days())) {
                return false;
            }
        }
        true
    }

    /// Describe the traversal for one root in `find` syntax.
    ///
    /// This is an audit aid for operators; quoting is not shell-safe.
    pub fn describe(&self, root: &Path) -> String {
        CriteriaDescription {
            criteria: self,
            root,
        }
        .to_string()
    }
}

struct CriteriaDescription<'a> {
    criteria: &'a Criteria,
    root: &'a Path,
}

impl fmt::Display for CriteriaDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "find {}", self.root.display())?;
        if let DepthLimit::Limited(depth) = self.criteria.max_depth {
            write!(f, " -maxdepth {}", depth)?;
        }
        write!(f, " -type {}", self.criteria.kind.find_flag())?;
        if let Some(pattern) = &self.criteria.name {
            write!(f, " -name {}", pattern.as_str())?;
        }
        if let Some(age) = self.criteria.min_age {
            write!(f, " -mtime +{}", age.days())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn criteria(config: JobConfig) -> Criteria {
        Criteria::from_config(&config, true).unwrap()
    }

    #[test]
    fn test_requires_match_or_older() {
        let config = JobConfig::new().with("root", "/tmp").with("recurse", false);
        assert_eq!(
            Criteria::from_config(&config, true),
            Err(ParamError::Unconstrained)
        );
        assert!(Criteria::from_config(&config, false).is_ok());
    }

    #[test]
    fn test_depth_policy() {
        let explicit = criteria(
            JobConfig::new()
                .with("older", "1d")
                .with("depth", "3")
                .with("recurse", false),
        );
        assert_eq!(explicit.max_depth(), DepthLimit::Limited(3));

        let flat = criteria(JobConfig::new().with("older", "1d").with("recurse", false));
        assert_eq!(flat.max_depth(), DepthLimit::Limited(1));

        let deep = criteria(JobConfig::new().with("older", "1d").with("recurse", "True"));
        assert_eq!(deep.max_depth(), DepthLimit::Unlimited);

        let unset = criteria(JobConfig::new().with("older", "1d"));
        assert_eq!(unset.max_depth(), DepthLimit::Unlimited);
    }

    #[test]
    fn test_older_accepts_integer_days() {
        let c = criteria(JobConfig::new().with("older", 10i64));
        assert_eq!(c.min_age(), Some(AgeThreshold::from_days(10)));

        let err = Criteria::from_config(&JobConfig::new().with("older", "10q"), true);
        assert_eq!(err, Err(ParamError::InvalidAge("10q".to_string())));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = Criteria::from_config(&JobConfig::new().with("match", "[unclosed"), true);
        assert!(matches!(err, Err(ParamError::InvalidPattern { .. })));
    }

    #[test]
    fn test_admits_by_name_kind_and_age() {
        let now = Utc::now();
        let c = criteria(JobConfig::new().with("match", "*.log").with("older", "7d"));

        let old = now - Duration::days(10);
        let fresh = now - Duration::days(3);
        let exact = now - Duration::days(7);

        assert!(c.admits(OsStr::new("app.log"), EntryKind::File, old, now));
        assert!(c.admits(OsStr::new("app.log"), EntryKind::File, exact, now));
        assert!(!c.admits(OsStr::new("app.log"), EntryKind::File, fresh, now));
        assert!(!c.admits(OsStr::new("app.txt"), EntryKind::File, old, now));
        assert!(!c.admits(OsStr::new("app.log"), EntryKind::Dir, old, now));
        assert!(!c.admits(OsStr::new(".log.bak"), EntryKind::File, old, now));
    }

    #[test]
    fn test_kind_parsing() {
        let c = criteria(JobConfig::new().with("match", "cache*").with("kind", "dir"));
        assert_eq!(c.kind(), EntryKind::Dir);
        let config = JobConfig::new().with("match", "x").with("kind", "socket");
        assert!(matches!(
            Criteria::from_config(&config, true),
            Err(ParamError::InvalidKind(_))
        ));
    }

    #[test]
    fn test_describe_reads_like_find() {
        let c = criteria(
            JobConfig::new()
                .with("match", "*.gz")
                .with("older", "2w")
                .with("recurse", false),
        );
        assert_eq!(
            c.describe(&PathBuf::from("/var/log")),
            "find /var/log -maxdepth 1 -type f -name *.gz -mtime +14"
        );
    }
}
