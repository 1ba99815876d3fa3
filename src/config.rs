//! Container options and the sources they can be loaded from.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

const DEFAULT_MAX_DEPTH: usize = 1024;

/// Tunables for a container lineage.
///
/// Every field has a default, so a partial document is enough:
///
/// ```rust
/// use config_injector::ContainerOptions;
///
/// let options = ContainerOptions::from_yaml_str("name: billing\ntrace_resolutions: true\n").unwrap();
/// assert_eq!(options.name, "billing");
/// assert!(options.trace_resolutions);
/// assert_eq!(options.max_depth, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerOptions {
    /// Name used in log fields and validation reports
    pub name: String,
    /// Deepest resolution path allowed before failing with `DepthExceeded`
    pub max_depth: usize,
    /// Install a [`LoggingObserver`](crate::LoggingObserver) on build
    pub trace_resolutions: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            name: "container".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            trace_resolutions: false,
        }
    }
}

impl ContainerOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(source: &str) -> DiResult<Self> {
        let options: Self = serde_json::from_str(source).map_err(|e| DiError::Config(e.to_string()))?;
        options.checked()
    }

    pub fn from_yaml_str(source: &str) -> DiResult<Self> {
        let options: Self = serde_yaml::from_str(source).map_err(|e| DiError::Config(e.to_string()))?;
        options.checked()
    }

    /// Reads `{PREFIX}_NAME`, `{PREFIX}_MAX_DEPTH` and `{PREFIX}_TRACE_RESOLUTIONS`.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env(prefix: &str) -> DiResult<Self> {
        let prefix = prefix.to_uppercase();
        let var = |field: &str| env::var(format!("{}_{}", prefix, field)).ok();

        let mut options = Self::default();
        if let Some(name) = var("NAME") {
            options.name = name;
        }
        if let Some(depth) = var("MAX_DEPTH") {
            options.max_depth = depth
                .parse()
                .map_err(|e| DiError::Config(format!("{}_MAX_DEPTH: {}", prefix, e)))?;
        }
        if let Some(flag) = var("TRACE_RESOLUTIONS") {
            options.trace_resolutions = flag
                .parse()
                .map_err(|e| DiError::Config(format!("{}_TRACE_RESOLUTIONS: {}", prefix, e)))?;
        }
        options.checked()
    }

    fn checked(self) -> DiResult<Self> {
        if self.max_depth == 0 {
            return Err(DiError::Config("max_depth must be > 0".to_string()));
        }
        Ok(self)
    }
}
