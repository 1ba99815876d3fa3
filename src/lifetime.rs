//! Dependency lifetime definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifetimes controlling instance caching behavior
///
/// # Lifetime Characteristics
///
/// - **Singleton**: resolved once per root lineage, shared with every scope
/// - **Scoped**: resolved once per container instance, never inherited by a new scope
/// - **Transient**: resolved fresh on every call, never cached
///
/// # Examples
///
/// ```rust
/// use config_injector::{Container, DefinitionMap, Factory, Lifetime};
///
/// let mut defs = DefinitionMap::new();
/// defs.add_value("url", "postgres://localhost".to_string());
/// defs.add_scoped("session", Factory::new(|_, _, _| Ok(42u64)));
///
/// let container = Container::from_definitions(defs);
/// assert_eq!(container.lifetime_of("url"), Some(Lifetime::Singleton));
/// assert_eq!(container.lifetime_of("session"), Some(Lifetime::Scoped));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// Single instance per root lineage, cached until the root is disposed
    ///
    /// Plain values are stored eagerly when the container is built; factory
    /// singletons run the first time they are requested anywhere in the
    /// lineage and the result is shared by all scopes.
    Singleton,
    /// Single instance per container instance
    ///
    /// Cached like a singleton inside the container that resolved it, but a
    /// scope created afterwards starts without it and computes its own.
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        };
        f.write_str(name)
    }
}
