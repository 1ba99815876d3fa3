//! Container module for dependency resolution.
//!
//! This module contains the [`Container`] type and the resolution engine
//! behind it: cache lookup, lifetime dispatch, recursive dependency
//! resolution and cycle detection.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::debug;

use crate::collection::DefinitionMap;
use crate::config::ContainerOptions;
use crate::context::Context;
use crate::definition::{Definition, Dependencies, Factory};
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::internal::{extract_dependency_names, ResolutionPath};
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, LoggingObserver, Observers};
use crate::token::{Token, Tokens};
use crate::validation::Unvalidated;
use crate::validator::{PredicateValidator, SchemaValidator};

pub mod context;
pub mod scope;
pub use context::ResolverContext;
pub use scope::ScopedResolver;

pub(crate) type InstanceCache = HashMap<Token, Instance>;

/// Dependency resolution container.
///
/// A container owns a shared, immutable [`DefinitionMap`] and the instance
/// caches for one node of a scope tree. Value singletons are stored as soon
/// as the container is built; everything else is produced on first request.
///
/// Cloning a `Container` clones the handle, not the caches: both handles see
/// the same instances. Use [`create_scope`](Container::create_scope) for an
/// isolated child.
///
/// The `State` parameter is a typestate marker: [`Container<Validated>`]
/// (see [`ValidatedContainer`](crate::ValidatedContainer)) can only be
/// obtained through the validation pass and behaves identically otherwise.
///
/// # Thread Safety
///
/// Caches sit behind `parking_lot` mutexes that are never held while a
/// factory runs. When two threads race on the same singleton the first
/// stored instance wins and both callers receive it.
///
/// # Examples
///
/// ```
/// use config_injector::{Container, DefinitionMap, Factory};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut defs = DefinitionMap::new();
/// defs.add_value("db", Database { url: "postgres://localhost".to_string() });
/// defs.add_transient(
///     "users",
///     Factory::new(|deps, _, _| Ok(UserService { db: deps.get::<Database>("db")? }))
///         .depends_on(["db"]),
/// );
///
/// let container = Container::from_definitions(defs);
/// let users = container.get::<UserService>("users").unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
pub struct Container<State = Unvalidated> {
    inner: Arc<ContainerInner>,
    _state: PhantomData<fn() -> State>,
}

pub(crate) struct ContainerInner {
    pub(crate) definitions: Arc<DefinitionMap>,
    pub(crate) validator: Arc<dyn SchemaValidator>,
    /// Value and factory singletons, shared by every scope of one lineage
    pub(crate) singletons: Arc<Mutex<InstanceCache>>,
    /// Scoped instances owned by this container only
    pub(crate) scoped: Mutex<InstanceCache>,
    pub(crate) observers: Arc<Observers>,
    pub(crate) options: Arc<ContainerOptions>,
    /// False for scopes created with `create_scope`
    pub(crate) is_root: bool,
}

impl Container<Unvalidated> {
    /// Builds a container from a schema validator and a definition map.
    pub fn new(validator: impl SchemaValidator + 'static, definitions: DefinitionMap) -> Self {
        Container::builder().validator(validator).build(definitions)
    }

    /// Builds a container using [`PredicateValidator`] and default options.
    pub fn from_definitions(definitions: DefinitionMap) -> Self {
        Container::builder().build(definitions)
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }
}

impl<State> Container<State> {
    pub(crate) fn from_inner(inner: ContainerInner) -> Self {
        Self {
            inner: Arc::new(inner),
            _state: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ContainerInner {
        &self.inner
    }

    /// Resolves a token with an empty context.
    pub fn resolve(&self, token: &str) -> DiResult<Instance> {
        self.resolve_with(token, &Context::new())
    }

    /// Resolves a token, handing `context` to every factory involved.
    pub fn resolve_with(&self, token: &str, context: &Context) -> DiResult<Instance> {
        self.inner.resolve_in(token, context, &ResolutionPath::new())
    }

    /// Resolves a token and downcasts it to `T`.
    pub fn get<T: Any + Send + Sync>(&self, token: &str) -> DiResult<Arc<T>> {
        typed(token, self.resolve(token)?)
    }

    pub fn get_with<T: Any + Send + Sync>(&self, token: &str, context: &Context) -> DiResult<Arc<T>> {
        typed(token, self.resolve_with(token, context)?)
    }

    /// Every declared token, keyed by its own name.
    pub fn tokens(&self) -> Tokens {
        self.inner.definitions.tokens()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.inner.definitions.contains(token)
    }

    pub fn lifetime_of(&self, token: &str) -> Option<Lifetime> {
        self.inner.definitions.get(token).map(Definition::lifetime)
    }

    /// Whether this container currently holds a cached instance for `token`.
    pub fn is_cached(&self, token: &str) -> bool {
        self.inner.cached(token).is_some()
    }

    pub fn definitions(&self) -> &DefinitionMap {
        &self.inner.definitions
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    /// True when both handles point at the same container instance.
    pub fn same_container<Other>(&self, other: &Container<Other>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("=== Container {} ===\n", self.inner.options.name));
        for (token, definition) in self.inner.definitions.iter() {
            s.push_str(&format!(
                "  {}: {} ({}){}\n",
                token,
                definition.lifetime(),
                definition.shape().describe(),
                if self.is_cached(token) { " [cached]" } else { "" }
            ));
        }
        s
    }
}

impl<State> Clone for Container<State> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _state: PhantomData,
        }
    }
}

impl<State> std::fmt::Debug for Container<State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.inner.options.name)
            .field("state", &std::any::type_name::<State>())
            .field("tokens", &self.inner.definitions.len())
            .field("singletons", &self.inner.singletons.lock().len())
            .field("scoped", &self.inner.scoped.lock().len())
            .finish()
    }
}

pub(crate) fn typed<T: Any + Send + Sync>(token: &str, instance: Instance) -> DiResult<Arc<T>> {
    instance.downcast::<T>().ok_or_else(|| DiError::TypeMismatch {
        token: token.to_string(),
        expected: std::any::type_name::<T>(),
        actual: instance.type_name(),
    })
}

impl ContainerInner {
    /// Fresh root of a new lineage.
    fn root(
        definitions: Arc<DefinitionMap>,
        validator: Arc<dyn SchemaValidator>,
        observers: Arc<Observers>,
        options: Arc<ContainerOptions>,
    ) -> Self {
        let inner = Self {
            definitions,
            validator,
            singletons: Arc::new(Mutex::new(HashMap::new())),
            scoped: Mutex::new(HashMap::new()),
            observers,
            options,
            is_root: true,
        };
        inner.populate_values();
        inner
    }

    /// New lineage over `definitions`, starting from copies of both caches.
    pub(crate) fn fork(&self, definitions: Arc<DefinitionMap>) -> Self {
        let singletons = self.singletons.lock().clone();
        let scoped = self.scoped.lock().clone();
        let inner = Self {
            definitions,
            validator: self.validator.clone(),
            singletons: Arc::new(Mutex::new(singletons)),
            scoped: Mutex::new(scoped),
            observers: self.observers.clone(),
            options: self.options.clone(),
            is_root: true,
        };
        inner.populate_values();
        inner
    }

    /// Child sharing the lineage singletons, with an empty scoped cache.
    pub(crate) fn child(&self) -> Self {
        Self {
            definitions: self.definitions.clone(),
            validator: self.validator.clone(),
            singletons: self.singletons.clone(),
            scoped: Mutex::new(HashMap::new()),
            observers: self.observers.clone(),
            options: self.options.clone(),
            is_root: false,
        }
    }

    /// Eager population of plain value singletons.
    pub(crate) fn populate_values(&self) {
        let mut singletons = self.singletons.lock();
        for (token, definition) in self.definitions.iter() {
            if let Definition::Value { value, .. } = definition {
                singletons.insert(token.clone(), value.clone());
            }
        }
    }

    pub(crate) fn cached(&self, token: &str) -> Option<Instance> {
        let hit = self.singletons.lock().get(token).cloned();
        hit.or_else(|| self.scoped.lock().get(token).cloned())
    }

    pub(crate) fn resolve_in(
        &self,
        name: &str,
        context: &Context,
        path: &ResolutionPath,
    ) -> DiResult<Instance> {
        if let Some(hit) = self.cached(name) {
            return Ok(hit);
        }

        let (token, definition) = self
            .definitions
            .entry(name)
            .ok_or_else(|| DiError::Unresolvable(Token::from(name)))?;

        if path.contains(token) {
            return Err(DiError::Circular(path.cycle_with(token)));
        }
        if path.depth() >= self.options.max_depth {
            return Err(DiError::DepthExceeded(self.options.max_depth));
        }

        if !self.observers.has_observers() {
            return self.produce(token, definition, context, path);
        }

        let lifetime = definition.lifetime();
        let start = Instant::now();
        self.observers.resolving(token, lifetime);
        let result = self.produce(token, definition, context, path);
        match &result {
            Ok(_) => self.observers.resolved(token, lifetime, start.elapsed()),
            Err(e) => self.observers.failed(token, e),
        }
        result
    }

    fn produce(
        &self,
        token: &Token,
        definition: &Definition,
        context: &Context,
        path: &ResolutionPath,
    ) -> DiResult<Instance> {
        match definition {
            // Only reachable between a dispose and its re-population.
            Definition::Value { value, .. } => Ok(store(&self.singletons, token, value.clone())),
            Definition::Singleton { factory, .. } => {
                let instance = self.invoke(token, factory, context, path)?;
                Ok(store(&self.singletons, token, instance))
            }
            Definition::Scoped { factory, .. } => {
                let instance = self.invoke(token, factory, context, path)?;
                Ok(store(&self.scoped, token, instance))
            }
            Definition::Transient { factory, .. } => self.invoke(token, factory, context, path),
        }
    }

    fn invoke(
        &self,
        token: &Token,
        factory: &Factory,
        context: &Context,
        path: &ResolutionPath,
    ) -> DiResult<Instance> {
        let names = extract_dependency_names(token, factory)?;
        let inner_path = path.extended(token);

        let mut deps = Dependencies::with_capacity(names.len());
        for name in names {
            let instance = self.resolve_in(&name, context, &inner_path)?;
            deps.insert(name, instance);
        }

        let resolver = ResolverContext::new(self, inner_path, context);
        factory
            .invoke(&deps, &resolver, context)
            .map_err(|e| e.with_factory_token(token))
    }
}

// First writer wins; a racing thread gets the stored instance back.
fn store(cache: &Mutex<InstanceCache>, token: &Token, instance: Instance) -> Instance {
    cache.lock().entry(token.clone()).or_insert(instance).clone()
}

/// Configures validator, options and observers before building a container.
///
/// # Examples
///
/// ```
/// use config_injector::{Container, ContainerOptions, DefinitionMap, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut defs = DefinitionMap::new();
/// defs.add_value("port", 8080u16);
///
/// let container = Container::builder()
///     .options(ContainerOptions::named("http"))
///     .observer(Arc::new(LoggingObserver::named("http")))
///     .build(defs);
/// assert_eq!(container.options().name, "http");
/// ```
pub struct ContainerBuilder {
    validator: Arc<dyn SchemaValidator>,
    options: ContainerOptions,
    observers: Observers,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            validator: Arc::new(PredicateValidator::new()),
            options: ContainerOptions::default(),
            observers: Observers::new(),
        }
    }

    pub fn validator(mut self, validator: impl SchemaValidator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    pub fn options(mut self, options: ContainerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn observer<O: DiObserver + 'static>(mut self, observer: Arc<O>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn build(self, definitions: DefinitionMap) -> Container {
        let mut observers = self.observers;
        if self.options.trace_resolutions {
            observers.add(Arc::new(LoggingObserver::named(self.options.name.clone())));
        }

        debug!(
            container = %self.options.name,
            definitions = definitions.len(),
            observers = observers.len(),
            "building container"
        );

        Container::from_inner(ContainerInner::root(
            Arc::new(definitions),
            self.validator,
            Arc::new(observers),
            Arc::new(self.options),
        ))
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
