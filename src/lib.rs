// Library module for housekeeper
// Re-exports modules for use in integration tests and the binary

pub mod engine;
pub mod enumerator;
pub mod error;
pub mod fs;
pub mod jobs;
pub mod output;
pub mod params;
pub mod retention;
pub mod sources;

pub use engine::{Engine, FailurePolicy, RunOptions, RunSummary};
pub use error::{EnumerationError, JobError, ParamError};
pub use jobs::{Job, JobRegistry, JobReport, Mode};
pub use output::Output;
pub use params::{JobConfig, JobSet, ParamValue};
