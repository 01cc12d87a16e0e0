//! Parsed job definitions.
//!
//! Job files arrive in several formats. YAML keeps native booleans and
//! integers while INI turns everything into strings, so every field accessor
//! here accepts both representations.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::ParamError;

/// Key holding the job variant tag. Never validated against a parameter set.
pub const TYPE_KEY: &str = "type";

/// A single job parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Render the value the way an operator would have written it.
    pub fn to_text(&self) -> String {
        match self {
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Text(s) => s.clone(),
            ParamValue::List(items) => items
                .iter()
                .map(ParamValue::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Restricted string-to-boolean conversion for config values.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Parameters of one job, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct JobConfig {
    params: BTreeMap<String, ParamValue>,
}

impl JobConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for defaults and tests.
    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.params.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The variant tag, if one was given.
    pub fn type_tag(&self) -> Option<String> {
        self.get(TYPE_KEY).map(ParamValue::to_text)
    }

    /// Layer `self` over `defaults`; explicit values win.
    pub fn merged_over(&self, defaults: &JobConfig) -> JobConfig {
        let mut merged = defaults.clone();
        for (key, value) in &self.params {
            merged.params.insert(key.clone(), value.clone());
        }
        merged
    }

    /// A scalar field as text. Lists are rejected.
    pub fn text(&self, key: &'static str) -> Result<Option<String>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(ParamValue::List(_)) => Err(ParamError::NotText(key)),
            Some(value) => Ok(Some(value.to_text())),
        }
    }

    /// A field holding one or more strings, such as `root`.
    pub fn text_list(&self, key: &'static str) -> Result<Option<Vec<String>>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(ParamValue::List(items)) => items
                .iter()
                .map(|item| match item {
                    ParamValue::List(_) => Err(ParamError::NotText(key)),
                    other => Ok(other.to_text()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(value) => Ok(Some(vec![value.to_text()])),
        }
    }

    pub fn unsigned(&self, key: &'static str) -> Result<Option<usize>, ParamError> {
        let invalid = |value: String| ParamError::NotAnInteger { field: key, value };
        match self.get(key) {
            None => Ok(None),
            Some(ParamValue::Integer(i)) => usize::try_from(*i)
                .map(Some)
                .map_err(|_| invalid(i.to_string())),
            Some(ParamValue::Text(s)) => s
                .trim()
                .parse::<usize>()
                .map(Some)
                .map_err(|_| invalid(s.clone())),
            Some(other) => Err(invalid(other.to_text())),
        }
    }

    pub fn boolean(&self, key: &'static str) -> Result<Option<bool>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(ParamValue::Bool(b)) => Ok(Some(*b)),
            Some(ParamValue::Text(s)) => parse_bool(s).map(Some).ok_or_else(|| {
                ParamError::NotABoolean {
                    field: key,
                    value: s.clone(),
                }
            }),
            Some(ParamValue::Integer(i @ (0 | 1))) => Ok(Some(*i == 1)),
            Some(other) => Err(ParamError::NotABoolean {
                field: key,
                value: other.to_text(),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for JobConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// All configured jobs, in the order they were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSet {
    jobs: Vec<(String, JobConfig)>,
}

impl JobSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job. A job with the same name is replaced in place, so a later
    /// config file can override an earlier one without reordering the run.
    pub fn insert(&mut self, name: impl Into<String>, config: JobConfig) {
        let name = name.into();
        match self.jobs.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = config,
            None => self.jobs.push((name, config)),
        }
    }

    pub fn extend(&mut self, other: JobSet) {
        for (name, config) in other.jobs {
            self.insert(name, config);
        }
    }

    pub fn get(&self, name: &str) -> Option<&JobConfig> {
        self.jobs
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, config)| config)
    }

    /// Keep only the named jobs. Returns the names that matched no job.
    pub fn retain_named(&mut self, names: &[String]) -> Vec<String> {
        let unknown = names
            .iter()
            .filter(|name| self.get(name).is_none())
            .cloned()
            .collect();
        self.jobs.retain(|(name, _)| names.contains(name));
        unknown
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JobConfig)> {
        self.jobs.iter().map(|(name, config)| (name.as_str(), config))
    }

    pub fn names(&self) -> Vec<&str> {
        self.jobs.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, JobConfig)> for JobSet {
    fn from_iter<I: IntoIterator<Item = (N, JobConfig)>>(iter: I) -> Self {
        let mut set = JobSet::new();
        for (name, config) in iter {
            set.insert(name, config);
        }
        set
    }
}
