//! Internal implementation details.

pub(crate) mod extract;
pub(crate) mod path;

pub use extract::extract_dependency_names;
pub(crate) use path::ResolutionPath;
