//! Retention criteria: what a job selects, independent of what it does with
//! the selection.

pub mod age;
pub mod criteria;
pub mod roots;

pub use age::AgeThreshold;
pub use criteria::{Criteria, DepthLimit, EntryKind, NamePattern};
pub use roots::resolve_roots;
