//! Dependency definitions: how each token is produced and how long it lives.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;
use crate::shape::Shape;
use crate::token::Token;

/// Erased factory signature stored in a [`Factory`].
pub type FactoryFn =
    dyn for<'a> Fn(&Dependencies, &ResolverContext<'a>, &Context) -> DiResult<Instance> + Send + Sync;

/// Name a factory may declare to say "I take no dependencies".
pub const NO_DEPENDENCIES: &str = "_";

/// The dependency parameter a factory declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyParam {
    /// Factory takes no dependency argument at all
    Absent,
    /// Factory names the tokens it needs, in declaration order
    Declared(Vec<String>),
}

/// Produces a dependency value from its resolved dependencies.
///
/// A factory declares the tokens it needs up front with
/// [`depends_on`](Factory::depends_on); the container resolves those before
/// invoking it and passes them in as [`Dependencies`]. The factory also
/// receives a [`ResolverContext`] for on-demand resolution and the caller's
/// [`Context`] bag.
///
/// # Examples
///
/// ```rust
/// use config_injector::{Container, DefinitionMap, Factory};
///
/// struct Repo { url: String }
///
/// let mut defs = DefinitionMap::new();
/// defs.add_value("url", "postgres://localhost".to_string());
/// defs.add_singleton(
///     "repo",
///     Factory::new(|deps, _, _| Ok(Repo { url: deps.get::<String>("url")?.to_string() }))
///         .depends_on(["url"]),
/// );
///
/// let container = Container::from_definitions(defs);
/// assert_eq!(container.get::<Repo>("repo").unwrap().url, "postgres://localhost");
/// ```
#[derive(Clone)]
pub struct Factory {
    param: DependencyParam,
    produce: Arc<FactoryFn>,
    shape: Shape,
}

impl Factory {
    /// Typed factory; its default shape is "instance of `T`".
    pub fn new<T, F>(f: F) -> Self
    where
        T: Any + Send + Sync,
        F: for<'a> Fn(&Dependencies, &ResolverContext<'a>, &Context) -> DiResult<T>
            + Send
            + Sync
            + 'static,
    {
        Self {
            param: DependencyParam::Absent,
            produce: erase(move |deps, resolver, ctx| f(deps, resolver, ctx).map(Instance::new)),
            shape: Shape::instance_of::<T>(),
        }
    }

    /// Factory returning an already shared value (`Arc<T>`), stored as is.
    pub fn shared<T, F>(f: F) -> Self
    where
        T: Any + Send + Sync,
        F: for<'a> Fn(&Dependencies, &ResolverContext<'a>, &Context) -> DiResult<Arc<T>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            param: DependencyParam::Absent,
            produce: erase(move |deps, resolver, ctx| {
                f(deps, resolver, ctx).map(Instance::from_arc)
            }),
            shape: Shape::instance_of::<T>(),
        }
    }

    /// Factory producing erased instances; unchecked unless a shape is set.
    pub fn erased<F>(f: F) -> Self
    where
        F: for<'a> Fn(&Dependencies, &ResolverContext<'a>, &Context) -> DiResult<Instance>
            + Send
            + Sync
            + 'static,
    {
        Self {
            param: DependencyParam::Absent,
            produce: erase(f),
            shape: Shape::Unchecked,
        }
    }

    /// Declares the tokens this factory needs.
    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.param = DependencyParam::Declared(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn param(&self) -> &DependencyParam {
        &self.param
    }

    pub(crate) fn default_shape(&self) -> Shape {
        self.shape.clone()
    }

    pub(crate) fn invoke(
        &self,
        deps: &Dependencies,
        resolver: &ResolverContext<'_>,
        ctx: &Context,
    ) -> DiResult<Instance> {
        (self.produce)(deps, resolver, ctx)
    }
}

fn erase<F>(f: F) -> Arc<FactoryFn>
where
    F: for<'a> Fn(&Dependencies, &ResolverContext<'a>, &Context) -> DiResult<Instance>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("param", &self.param)
            .field("shape", &self.shape.describe())
            .finish()
    }
}

/// Resolved arguments handed to a factory, keyed by dependency name.
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    entries: Vec<(Token, Instance)>,
}

impl Dependencies {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, token: Token, instance: Instance) {
        self.entries.push((token, instance));
    }

    pub fn instance(&self, name: &str) -> DiResult<&Instance> {
        self.entries
            .iter()
            .find(|(t, _)| t.as_str() == name)
            .map(|(_, i)| i)
            .ok_or_else(|| DiError::UndeclaredDependency(name.to_string()))
    }

    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> DiResult<Arc<T>> {
        let instance = self.instance(name)?;
        instance.downcast::<T>().ok_or_else(|| DiError::TypeMismatch {
            token: name.to_string(),
            expected: std::any::type_name::<T>(),
            actual: instance.type_name(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a definition built from a runtime [`Lifetime`] gets its value.
#[derive(Clone, Debug)]
pub enum Provision {
    Value(Instance),
    Factory(Factory),
}

/// How a token's value is produced, and under which lifetime.
#[derive(Clone, Debug)]
pub enum Definition {
    /// Precomputed singleton, stored when the container is built
    Value { value: Instance, shape: Shape },
    /// Computed once per lineage on first request
    Singleton { factory: Factory, shape: Shape },
    /// Computed once per container instance
    Scoped { factory: Factory, shape: Shape },
    /// Computed on every request
    Transient { factory: Factory, shape: Shape },
}

impl Definition {
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Definition::Value {
            value: Instance::new(value),
            shape: Shape::instance_of::<T>(),
        }
    }

    pub fn singleton(factory: Factory) -> Self {
        let shape = factory.default_shape();
        Definition::Singleton { factory, shape }
    }

    pub fn scoped(factory: Factory) -> Self {
        let shape = factory.default_shape();
        Definition::Scoped { factory, shape }
    }

    pub fn transient(factory: Factory) -> Self {
        let shape = factory.default_shape();
        Definition::Transient { factory, shape }
    }

    /// Builds a definition from a lifetime chosen at runtime.
    ///
    /// Only singletons may be plain values; a scoped or transient token
    /// without a factory is rejected.
    pub fn from_parts(token: &Token, lifetime: Lifetime, provision: Provision) -> DiResult<Self> {
        match (lifetime, provision) {
            (Lifetime::Singleton, Provision::Value(value)) => Ok(Definition::Value {
                value,
                shape: Shape::Unchecked,
            }),
            (Lifetime::Singleton, Provision::Factory(factory)) => Ok(Definition::singleton(factory)),
            (Lifetime::Scoped, Provision::Factory(factory)) => Ok(Definition::scoped(factory)),
            (Lifetime::Transient, Provision::Factory(factory)) => Ok(Definition::transient(factory)),
            (lifetime, Provision::Value(_)) => Err(DiError::InvalidDefinition {
                token: token.clone(),
                reason: format!("{} definitions require a factory", lifetime),
            }),
        }
    }

    /// Replaces the validation shape.
    pub fn with_shape(mut self, new_shape: Shape) -> Self {
        match &mut self {
            Definition::Value { shape, .. }
            | Definition::Singleton { shape, .. }
            | Definition::Scoped { shape, .. }
            | Definition::Transient { shape, .. } => *shape = new_shape,
        }
        self
    }

    pub fn lifetime(&self) -> Lifetime {
        match self {
            Definition::Value { .. } | Definition::Singleton { .. } => Lifetime::Singleton,
            Definition::Scoped { .. } => Lifetime::Scoped,
            Definition::Transient { .. } => Lifetime::Transient,
        }
    }

    pub fn shape(&self) -> &Shape {
        match self {
            Definition::Value { shape, .. }
            | Definition::Singleton { shape, .. }
            | Definition::Scoped { shape, .. }
            | Definition::Transient { shape, .. } => shape,
        }
    }

    pub fn factory(&self) -> Option<&Factory> {
        match self {
            Definition::Value { .. } => None,
            Definition::Singleton { factory, .. }
            | Definition::Scoped { factory, .. }
            | Definition::Transient { factory, .. } => Some(factory),
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Definition::Value { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetimes_of_each_variant() {
        let f = || Factory::new(|_, _, _| Ok(1u8));
        assert_eq!(Definition::value(1u8).lifetime(), Lifetime::Singleton);
        assert_eq!(Definition::singleton(f()).lifetime(), Lifetime::Singleton);
        assert_eq!(Definition::scoped(f()).lifetime(), Lifetime::Scoped);
        assert_eq!(Definition::transient(f()).lifetime(), Lifetime::Transient);
    }

    #[test]
    fn typed_factories_default_to_instance_shape() {
        let def = Definition::singleton(Factory::new(|_, _, _| Ok(String::new())));
        assert_eq!(def.shape().describe(), std::any::type_name::<String>());

        let erased = Definition::singleton(Factory::erased(|_, _, _| Ok(Instance::new(1u8))));
        assert!(matches!(erased.shape(), Shape::Unchecked));
    }

    #[test]
    fn scoped_value_is_rejected() {
        let token = Token::new("session");
        let err = Definition::from_parts(&token, Lifetime::Scoped, Provision::Value(Instance::new(1u8)))
            .unwrap_err();
        match err {
            DiError::InvalidDefinition { token, reason } => {
                assert_eq!(token, "session");
                assert!(reason.contains("scoped"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn reading_undeclared_argument_fails() {
        let deps = Dependencies::default();
        assert!(matches!(deps.get::<u8>("x"), Err(DiError::UndeclaredDependency(n)) if n == "x"));
    }

    #[test]
    fn reading_argument_as_wrong_type_fails() {
        let mut deps = Dependencies::default();
        deps.insert("x".into(), Instance::new(1u8));
        assert!(matches!(deps.get::<String>("x"), Err(DiError::TypeMismatch { .. })));
        assert_eq!(*deps.get::<u8>("x").unwrap(), 1);
    }
}
