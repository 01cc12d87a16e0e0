//! Job type registry.
//!
//! Maps the `type` tag of a job definition to the variant that implements
//! it, the parameters that variant accepts and the defaults merged under
//! the explicit config.

use crate::error::JobError;
use crate::jobs::{Job, Mode, PruneJob, RetainNewestJob};
use crate::params::{JobConfig, TYPE_KEY};

/// Tag used when a job does not name its type.
pub const DEFAULT_JOB_TYPE: &str = "find-remove";

pub type Constructor = fn(&str, &JobConfig, Mode) -> Result<Box<dyn Job>, JobError>;

/// Everything the engine needs to know about one variant.
#[derive(Clone)]
pub struct JobSpec {
    pub tag: &'static str,
    pub aliases: &'static [&'static str],
    pub variant: &'static str,
    pub parameters: &'static [&'static str],
    defaults: fn() -> JobConfig,
    construct: Constructor,
}

impl JobSpec {
    pub fn new(
        tag: &'static str,
        variant: &'static str,
        parameters: &'static [&'static str],
        defaults: fn() -> JobConfig,
        construct: Constructor,
    ) -> Self {
        Self {
            tag,
            aliases: &[],
            variant,
            parameters,
            defaults,
            construct,
        }
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn answers_to(&self, tag: &str) -> bool {
        self.tag == tag || self.aliases.contains(&tag)
    }

    pub fn defaults(&self) -> JobConfig {
        (self.defaults)()
    }

    /// Merge defaults under `config` and check every field against the
    /// accepted parameter set. The `type` tag itself is always allowed.
    pub fn prepare(&self, job: &str, config: &JobConfig) -> Result<JobConfig, JobError> {
        let merged = config.merged_over(&self.defaults());
        if let Some(field) = merged
            .keys()
            .find(|key| *key != TYPE_KEY && !self.parameters.contains(key))
        {
            return Err(JobError::InvalidParameter {
                job: job.to_string(),
                field: field.to_string(),
                variant: self.variant,
            });
        }
        Ok(merged)
    }

    pub fn construct(&self, job: &str, config: &JobConfig, mode: Mode) -> Result<Box<dyn Job>, JobError> {
        (self.construct)(job, config, mode)
    }
}

impl std::fmt::Debug for JobSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobSpec")
            .field("tag", &self.tag)
            .field("aliases", &self.aliases)
            .field("variant", &self.variant)
            .field("parameters", &self.parameters)
            .finish()
    }
}

fn recurse_off() -> JobConfig {
    JobConfig::new().with("recurse", false)
}

fn build_prune(job: &str, config: &JobConfig, mode: Mode) -> Result<Box<dyn Job>, JobError> {
    Ok(Box::new(PruneJob::new(job, config, mode)?))
}

fn build_retain(job: &str, config: &JobConfig, mode: Mode) -> Result<Box<dyn Job>, JobError> {
    Ok(Box::new(RetainNewestJob::new(job, config, mode)?))
}

/// Lookup table from type tag to variant.
#[derive(Debug, Clone)]
pub struct JobRegistry {
    specs: Vec<JobSpec>,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl JobRegistry {
    /// Registry without any variants.
    pub fn empty() -> Self {
        Self { specs: Vec::new() }
    }

    /// The built-in variants.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(
            JobSpec::new(
                DEFAULT_JOB_TYPE,
                PruneJob::VARIANT,
                PruneJob::PARAMETERS,
                recurse_off,
                build_prune,
            )
            .with_aliases(&["prune"]),
        );
        registry.register(
            JobSpec::new(
                "keep",
                RetainNewestJob::VARIANT,
                RetainNewestJob::PARAMETERS,
                recurse_off,
                build_retain,
            )
            .with_aliases(&["retain-newest"]),
        );
        registry
    }

    /// Add a variant. A spec registered later wins for shared tags.
    pub fn register(&mut self, spec: JobSpec) {
        self.specs.insert(0, spec);
    }

    pub fn lookup(&self, job: &str, tag: &str) -> Result<&JobSpec, JobError> {
        self.specs
            .iter()
            .find(|spec| spec.answers_to(tag))
            .ok_or_else(|| JobError::UnknownJobType {
                job: job.to_string(),
                tag: tag.to_string(),
            })
    }

    /// Resolve, validate and build one job.
    pub fn instantiate(&self, job: &str, config: &JobConfig, mode: Mode) -> Result<Box<dyn Job>, JobError> {
        let tag = config
            .type_tag()
            .unwrap_or_else(|| DEFAULT_JOB_TYPE.to_string());
        let spec = self.lookup(job, &tag)?;
        let merged = spec.prepare(job, config)?;
        tracing::debug!(job, tag = spec.tag, variant = spec.variant, "Job prepared");
        spec.construct(job, &merged, mode)
    }

    pub fn tags(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.tag).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_by_tag_and_alias() {
        let registry = JobRegistry::standard();
        assert_eq!(registry.lookup("j", "find-remove").unwrap().variant, "PruneJob");
        assert_eq!(registry.lookup("j", "prune").unwrap().variant, "PruneJob");
        assert_eq!(registry.lookup("j", "keep").unwrap().variant, "RetainNewestJob");
        assert_eq!(
            registry.lookup("j", "retain-newest").unwrap().variant,
            "RetainNewestJob"
        );
    }

    #[test]
    fn test_unknown_tag_names_the_tag() {
        let registry = JobRegistry::standard();
        let err = registry.lookup("cleanup", "archive").unwrap_err();
        assert_eq!(err.to_string(), "cleanup: no such type definition: 'archive'");
    }

    #[test]
    fn test_prepare_merges_defaults() {
        let registry = JobRegistry::standard();
        let spec = registry.lookup("j", "prune").unwrap();

        let merged = spec
            .prepare("j", &JobConfig::new().with("root", "/tmp").with("match", "*"))
            .unwrap();
        assert_eq!(merged.boolean("recurse").unwrap(), Some(false));

        let merged = spec
            .prepare("j", &JobConfig::new().with("recurse", "true"))
            .unwrap();
        assert_eq!(merged.boolean("recurse").unwrap(), Some(true));
    }

    #[test]
    fn test_prepare_rejects_foreign_fields() {
        let registry = JobRegistry::standard();
        let spec = registry.lookup("j", "find-remove").unwrap();

        let config = JobConfig::new()
            .with("type", "find-remove")
            .with("root", "/tmp")
            .with("keep", "3");
        let err = spec.prepare("logs", &config).unwrap_err();
        assert!(matches!(
            err,
            JobError::InvalidParameter { ref field, variant: "PruneJob", .. } if field == "keep"
        ));

        let spec = registry.lookup("j", "keep").unwrap();
        assert!(spec.prepare("logs", &config).is_ok());
    }

    #[test]
    fn test_instantiate_defaults_to_prune() {
        let temp = TempDir::new().unwrap();
        let config = JobConfig::new()
            .with("root", temp.path().display().to_string())
            .with("older", "7d");

        let job = JobRegistry::standard()
            .instantiate("tmp", &config, Mode::DryRun)
            .unwrap();
        assert_eq!(job.variant(), "PruneJob");
        assert_eq!(job.parameters(), PruneJob::PARAMETERS);
        assert_eq!(job.base().roots(), [temp.path().to_path_buf()]);
    }

    #[test]
    fn test_registered_spec_takes_precedence() {
        let mut registry = JobRegistry::standard();
        registry.register(JobSpec::new(
            "prune",
            RetainNewestJob::VARIANT,
            RetainNewestJob::PARAMETERS,
            JobConfig::new,
            build_retain,
        ));
        assert_eq!(registry.lookup("j", "prune").unwrap().variant, "RetainNewestJob");
        assert_eq!(registry.tags(), vec!["prune", "keep", "find-remove"]);
    }
}
