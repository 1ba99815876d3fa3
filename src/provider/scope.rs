//! Scope creation, chaining and cache disposal.
//!
//! This module contains the scope-tree operations of [`Container`] and the
//! [`ScopedResolver`] type for resolving one token per unit of work.

use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use super::{typed, Container, ContainerInner};
use crate::collection::DefinitionMap;
use crate::context::Context;
use crate::error::DiResult;
use crate::instance::Instance;
use crate::token::Token;
use crate::validation::Unvalidated;

impl<State> Container<State> {
    /// Creates a child container for one unit of work.
    ///
    /// The child shares this container's definitions and its lineage
    /// singletons, and starts with an empty scoped cache. Scoped tokens
    /// therefore resolve to a fresh instance per scope, while singletons
    /// first resolved inside a scope are visible to the root and to sibling
    /// scopes.
    ///
    /// # Examples
    ///
    /// ```
    /// use config_injector::{Container, DefinitionMap, Factory};
    /// use std::sync::Arc;
    ///
    /// struct RequestId(u64);
    ///
    /// let mut defs = DefinitionMap::new();
    /// defs.add_scoped("request", Factory::new(|_, _, _| Ok(RequestId(7))));
    ///
    /// let root = Container::from_definitions(defs);
    /// let scope = root.create_scope();
    ///
    /// let a = scope.get::<RequestId>("request").unwrap();
    /// let b = scope.get::<RequestId>("request").unwrap();
    /// assert!(Arc::ptr_eq(&a, &b));
    ///
    /// let other = root.create_scope().get::<RequestId>("request").unwrap();
    /// assert!(!Arc::ptr_eq(&a, &other));
    /// assert_eq!(other.0, 7);
    /// ```
    pub fn create_scope(&self) -> Self {
        debug!(container = %self.inner.options.name, "creating scope");
        Container::from_inner(self.inner.child())
    }

    /// Binds a token and a context for repeated per-scope resolution.
    ///
    /// The returned [`ScopedResolver`] resolves on the scope it is handed,
    /// or on a fresh scope of this container when given `None`.
    pub fn scoped_resolver(&self, token: impl Into<Token>, context: Context) -> ScopedResolver<State> {
        ScopedResolver {
            root: self.clone(),
            token: token.into(),
            context,
        }
    }

    /// Returns a new container whose definitions are this container's merged
    /// with `definitions`, the new definitions winning on conflicts.
    ///
    /// The new container starts its own lineage with copies of both caches,
    /// so everything resolved so far stays resolved; value singletons of the
    /// merged map are then stored again. Later resolutions on either
    /// container never affect the other. Chaining always yields an
    /// unvalidated container.
    ///
    /// # Examples
    ///
    /// ```
    /// use config_injector::{Container, DefinitionMap, Factory};
    /// use std::sync::Arc;
    ///
    /// let mut defs = DefinitionMap::new();
    /// defs.add_singleton("config", Factory::new(|_, _, _| Ok(String::from("prod"))));
    /// let base = Container::from_definitions(defs);
    /// let config = base.get::<String>("config").unwrap();
    ///
    /// let mut extra = DefinitionMap::new();
    /// extra.add_value("k", 3u8);
    /// let chained = base.chain(extra);
    ///
    /// assert!(Arc::ptr_eq(&config, &chained.get::<String>("config").unwrap()));
    /// assert_eq!(*chained.get::<u8>("k").unwrap(), 3);
    /// assert!(!base.contains("k"));
    /// ```
    pub fn chain(&self, definitions: DefinitionMap) -> Container<Unvalidated> {
        let added = definitions.len();
        let merged = self.inner.definitions.as_ref().clone().merge(definitions);
        debug!(
            container = %self.inner.options.name,
            added,
            total = merged.len(),
            "chaining definitions"
        );
        Container::from_inner(self.inner.fork(Arc::new(merged)))
    }

    /// Drops cached instances.
    ///
    /// On a scope created with [`create_scope`](Self::create_scope) only the
    /// scope's own scoped cache is cleared; the lineage singletons, which the
    /// root and sibling scopes rely on, stay untouched. On a root container
    /// both caches are cleared and the value singletons are stored again, so
    /// factory singletons run afresh on next resolution.
    ///
    /// The instances themselves are not torn down; anything still holding
    /// an `Arc` keeps it alive.
    pub fn dispose(&self) {
        let inner: &ContainerInner = &self.inner;
        let scoped = {
            let mut cache = inner.scoped.lock();
            let n = cache.len();
            cache.clear();
            n
        };
        if !inner.is_root {
            debug!(container = %inner.options.name, scoped, "disposed scope");
            return;
        }

        let singletons = {
            let mut cache = inner.singletons.lock();
            let n = cache.len();
            cache.clear();
            n
        };
        inner.populate_values();
        debug!(
            container = %inner.options.name,
            singletons,
            scoped,
            "disposed cached instances"
        );
    }
}

/// Resolves one token on a caller-chosen scope.
///
/// Created by [`Container::scoped_resolver`]. The same resolver can serve
/// many units of work: pass each unit's scope, or `None` to have a fresh
/// scope created from the originating container.
///
/// # Examples
///
/// ```
/// use config_injector::{Container, Context, DefinitionMap, Factory};
/// use std::sync::Arc;
///
/// let mut defs = DefinitionMap::new();
/// defs.add_scoped(
///     "greeting",
///     Factory::new(|_, _, ctx| Ok(format!("hello {}", ctx.get_as::<String>("user")?.unwrap_or_default()))),
/// );
///
/// let root = Container::from_definitions(defs);
/// let resolver = root.scoped_resolver("greeting", Context::new().with("user", "ada"));
///
/// let scope = root.create_scope();
/// let a = resolver.get::<String>(Some(&scope)).unwrap();
/// let b = resolver.get::<String>(Some(&scope)).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(*a, "hello ada");
///
/// let fresh = resolver.get::<String>(None).unwrap();
/// assert!(!Arc::ptr_eq(&a, &fresh));
/// ```
pub struct ScopedResolver<State = Unvalidated> {
    root: Container<State>,
    token: Token,
    context: Context,
}

impl<State> ScopedResolver<State> {
    pub fn resolve(&self, scope: Option<&Container<State>>) -> DiResult<Instance> {
        match scope {
            Some(scope) => scope.resolve_with(&self.token, &self.context),
            None => self.root.create_scope().resolve_with(&self.token, &self.context),
        }
    }

    pub fn get<T: Any + Send + Sync>(&self, scope: Option<&Container<State>>) -> DiResult<Arc<T>> {
        typed(&self.token, self.resolve(scope)?)
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}

impl<State> Clone for ScopedResolver<State> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            token: self.token.clone(),
            context: self.context.clone(),
        }
    }
}
