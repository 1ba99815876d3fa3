//! Ambient per-call parameters threaded through a resolution.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DiError, DiResult};

/// Open key/value bag passed to every factory of one resolution.
///
/// The container never inspects it; it hands the same bag to the factory of
/// the requested token and to the factories of everything that token pulls
/// in. Which keys exist is a convention between callers and factories.
///
/// # Examples
///
/// ```rust
/// use config_injector::{Container, Context, DefinitionMap, Factory};
///
/// let mut defs = DefinitionMap::new();
/// defs.add_transient(
///     "greeting",
///     Factory::new(|_, _, ctx| {
///         let who: String = ctx.get_as("user")?.unwrap_or_else(|| "world".to_string());
///         Ok(format!("hello {}", who))
///     }),
/// );
///
/// let container = Container::from_definitions(defs);
/// let ctx = Context::new().with("user", "ada");
/// assert_eq!(*container.get_with::<String>("greeting", &ctx).unwrap(), "hello ada");
/// assert_eq!(*container.get::<String>("greeting").unwrap(), "hello world");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Reads a key as `T`. A missing key is `Ok(None)`; a key holding
    /// something that doesn't deserialize as `T` is an error.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> DiResult<Option<T>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| DiError::Context {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Context {
    fn from(map: Map<String, Value>) -> Self {
        Context(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Context(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
