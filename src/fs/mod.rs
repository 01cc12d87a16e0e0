pub mod backend;
pub mod local;
pub mod types;

pub use backend::Traversal;
pub use local::LocalFs;
pub use types::*;
