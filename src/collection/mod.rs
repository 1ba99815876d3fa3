//! Definition map module for dependency registration.
//!
//! This module contains the [`DefinitionMap`] type used to declare every
//! token a container can resolve before the container is built.

use std::any::Any;
use std::collections::HashMap;

use crate::definition::{Definition, Factory, Provision};
use crate::error::DiResult;
use crate::lifetime::Lifetime;
use crate::provider::{Container, ContainerBuilder};
use crate::shape::Shape;
use crate::token::{Token, Tokens};

/// Ordered map from token to [`Definition`].
///
/// Declaration order is preserved: iteration, [`tokens`](Self::tokens) and
/// the validation report all follow the order in which tokens were first
/// added. Re-adding a token replaces its definition in place.
///
/// # Examples
///
/// ```rust
/// use config_injector::{DefinitionMap, Factory, Lifetime};
///
/// #[derive(Debug)]
/// struct Widget { label: String }
///
/// let mut defs = DefinitionMap::new();
/// defs.add_value("a", "a".to_string())
///     .add_singleton("b", Factory::new(|_, _, _| Ok(5u32)).depends_on(["a"]))
///     .add_scoped(
///         "c",
///         Factory::new(|deps, _, _| Ok(Widget { label: deps.get::<String>("a")?.to_string() }))
///             .depends_on(["a"]),
///     );
///
/// assert_eq!(defs.len(), 3);
/// assert_eq!(defs.get("c").map(|d| d.lifetime()), Some(Lifetime::Scoped));
///
/// let container = defs.build();
/// let scope1 = container.create_scope();
/// let scope2 = container.create_scope();
/// let w1 = scope1.get::<Widget>("c").unwrap();
/// let w2 = scope2.get::<Widget>("c").unwrap();
/// assert!(!std::sync::Arc::ptr_eq(&w1, &w2));
/// assert_eq!(w1.label, "a");
/// ```
#[derive(Clone, Debug, Default)]
pub struct DefinitionMap {
    entries: Vec<(Token, Definition)>,
    index: HashMap<Token, usize>,
}

impl DefinitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a definition.
    pub fn add(&mut self, token: impl Into<Token>, definition: Definition) -> &mut Self {
        let token = token.into();
        match self.index.get(&token) {
            Some(&pos) => self.entries[pos].1 = definition,
            None => {
                self.index.insert(token.clone(), self.entries.len());
                self.entries.push((token, definition));
            }
        }
        self
    }

    /// Registers a precomputed singleton value.
    pub fn add_value<T: Any + Send + Sync>(&mut self, token: impl Into<Token>, value: T) -> &mut Self {
        self.add(token, Definition::value(value))
    }

    pub fn add_singleton(&mut self, token: impl Into<Token>, factory: Factory) -> &mut Self {
        self.add(token, Definition::singleton(factory))
    }

    pub fn add_scoped(&mut self, token: impl Into<Token>, factory: Factory) -> &mut Self {
        self.add(token, Definition::scoped(factory))
    }

    pub fn add_transient(&mut self, token: impl Into<Token>, factory: Factory) -> &mut Self {
        self.add(token, Definition::transient(factory))
    }

    /// Registers a definition whose lifetime is only known at runtime.
    ///
    /// Fails with [`DiError::InvalidDefinition`](crate::DiError::InvalidDefinition)
    /// when a scoped or transient token is given a plain value.
    pub fn add_with_lifetime(
        &mut self,
        token: impl Into<Token>,
        lifetime: Lifetime,
        provision: Provision,
    ) -> DiResult<&mut Self> {
        let token = token.into();
        let definition = Definition::from_parts(&token, lifetime, provision)?;
        Ok(self.add(token, definition))
    }

    /// Replaces the validation shape of an already declared token.
    ///
    /// Returns `false` when the token is not declared.
    pub fn set_shape(&mut self, token: &str, shape: Shape) -> bool {
        match self.index.get(token) {
            Some(&pos) => {
                let def = self.entries[pos].1.clone();
                self.entries[pos].1 = def.with_shape(shape);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, token: &str) -> Option<&Definition> {
        self.index.get(token).map(|&pos| &self.entries[pos].1)
    }

    /// Looks up the declared token together with its definition.
    pub fn entry(&self, token: &str) -> Option<(&Token, &Definition)> {
        self.index
            .get(token)
            .map(|&pos| (&self.entries[pos].0, &self.entries[pos].1))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Declaration position of a token.
    pub fn position(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, &Definition)> {
        self.entries.iter().map(|(t, d)| (t, d))
    }

    pub fn tokens(&self) -> Tokens {
        Tokens::from_ordered(self.entries.iter().map(|(t, _)| t.clone()).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union of both maps; `other` wins on conflicts, existing positions are kept.
    pub fn merge(mut self, other: DefinitionMap) -> Self {
        for (token, definition) in other.entries {
            self.add(token, definition);
        }
        self
    }

    /// Builds a container with the default validator and options.
    pub fn build(self) -> Container {
        Container::from_definitions(self)
    }

    /// Builds a container through a configured builder.
    pub fn build_with(self, builder: ContainerBuilder) -> Container {
        builder.build(self)
    }
}

impl<T: Into<Token>> FromIterator<(T, Definition)> for DefinitionMap {
    fn from_iter<I: IntoIterator<Item = (T, Definition)>>(iter: I) -> Self {
        let mut map = DefinitionMap::new();
        for (token, definition) in iter {
            map.add(token, definition);
        }
        map
    }
}
