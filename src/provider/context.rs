//! Resolver context for dependency factories.
//!
//! This module contains the ResolverContext type which factories use to
//! resolve further dependencies while they run.

use std::any::Any;
use std::sync::Arc;

use super::{typed, ContainerInner};
use crate::context::Context;
use crate::error::DiResult;
use crate::instance::Instance;
use crate::internal::ResolutionPath;
use crate::token::Token;

/// Handle passed to factory functions for on-demand resolution.
///
/// Resolutions made through this handle continue the current resolution
/// path, so a factory that reaches back to a token already being resolved
/// gets a circular dependency error instead of recursing forever. The
/// caller's [`Context`] is reused unless another one is given.
///
/// # Examples
///
/// ```
/// use config_injector::{Container, DefinitionMap, Factory};
///
/// let mut defs = DefinitionMap::new();
/// defs.add_value("base", 40u32);
/// defs.add_transient(
///     "answer",
///     Factory::new(|_, resolver, _| Ok(*resolver.get::<u32>("base")? + 2)),
/// );
///
/// let container = Container::from_definitions(defs);
/// assert_eq!(*container.get::<u32>("answer").unwrap(), 42);
/// ```
pub struct ResolverContext<'a> {
    inner: &'a ContainerInner,
    path: ResolutionPath,
    context: &'a Context,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(inner: &'a ContainerInner, path: ResolutionPath, context: &'a Context) -> Self {
        Self {
            inner,
            path,
            context,
        }
    }

    pub fn resolve(&self, token: &str) -> DiResult<Instance> {
        self.inner.resolve_in(token, self.context, &self.path)
    }

    pub fn resolve_with(&self, token: &str, context: &Context) -> DiResult<Instance> {
        self.inner.resolve_in(token, context, &self.path)
    }

    pub fn get<T: Any + Send + Sync>(&self, token: &str) -> DiResult<Arc<T>> {
        typed(token, self.resolve(token)?)
    }

    /// Tokens being resolved above this factory, outermost first.
    pub fn path(&self) -> &[Token] {
        self.path.as_slice()
    }

    pub fn context(&self) -> &Context {
        self.context
    }
}
