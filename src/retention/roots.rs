// Root resolution
// Expands wildcard root expressions and checks that every root is a directory

use std::path::PathBuf;

use crate::error::ParamError;

/// Check if a string contains wildcard characters
pub fn contains_wildcard(s: &str) -> bool {
    s.contains('*') || s.contains('?') || s.contains('[')
}

/// Strip trailing separators, keeping a bare "/" intact
fn trim_root(expression: &str) -> &str {
    let trimmed = expression.trim_end_matches('/');
    if trimmed.is_empty() && expression.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// Expand one root expression into concrete paths
///
/// Expressions without wildcards are returned as-is, whether or not they
/// exist; the directory check happens in [`resolve_roots`]. Wildcards never
/// match dot-entries, and a trailing separator restricts matches to
/// directories.
pub fn expand_root(expression: &str) -> Result<Vec<PathBuf>, ParamError> {
    let expression = expression.trim();
    let trimmed = trim_root(expression);
    if trimmed.is_empty() {
        return Err(ParamError::InvalidRoot {
            expression: expression.to_string(),
            reason: "empty path".to_string(),
        });
    }

    if !contains_wildcard(trimmed) {
        return Ok(vec![PathBuf::from(trimmed)]);
    }

    let invalid = |reason: String| ParamError::InvalidRoot {
        expression: expression.to_string(),
        reason,
    };
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };
    let paths = glob::glob_with(expression, options).map_err(|e| invalid(e.to_string()))?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| invalid(e.to_string()))?;
        // drop any trailing separator kept from the pattern
        matches.push(path.components().collect::<PathBuf>());
    }

    if matches.is_empty() {
        return Err(ParamError::NoRoots(expression.to_string()));
    }

    Ok(matches)
}

/// Resolve all root expressions of a job
///
/// The result is sorted and free of duplicates so repeated runs walk the
/// roots in the same order. Every root must be an existing directory.
pub fn resolve_roots(expressions: &[String]) -> Result<Vec<PathBuf>, ParamError> {
    let mut roots = Vec::new();
    for expression in expressions {
        roots.extend(expand_root(expression)?);
    }

    roots.sort();
    roots.dedup();

    if let Some(bad) = roots.iter().find(|root| !root.is_dir()) {
        return Err(ParamError::NotADirectory(bad.clone()));
    }

    Ok(roots)
}
