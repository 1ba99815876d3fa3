//! Diagnostic observers for resolution traceability.
//!
//! Observers are notified synchronously around every resolution that misses
//! the instance cache. [`LoggingObserver`] forwards the events to `tracing`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::DiError;
use crate::lifetime::Lifetime;
use crate::token::Token;

/// Observer trait for resolution events.
///
/// Keep implementations lightweight: they run inline on the resolving
/// thread, inside the recursion.
///
/// # Examples
///
/// ```
/// use config_injector::{Container, DefinitionMap, DiError, DiObserver, Factory, Lifetime, Token};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, token: &Token, _lifetime: Lifetime) {
///         self.0.lock().unwrap().push(format!("start {}", token));
///     }
///
///     fn resolved(&self, token: &Token, _lifetime: Lifetime, _duration: Duration) {
///         self.0.lock().unwrap().push(format!("done {}", token));
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let mut defs = DefinitionMap::new();
/// defs.add_transient("n", Factory::new(|_, _, _| Ok(1u8)));
///
/// let container = Container::builder().observer(recorder.clone()).build(defs);
/// container.resolve("n").unwrap();
/// assert_eq!(*recorder.0.lock().unwrap(), vec!["start n", "done n"]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a token's definition is produced.
    fn resolving(&self, token: &Token, lifetime: Lifetime);

    /// Called after a token was produced successfully.
    fn resolved(&self, token: &Token, lifetime: Lifetime, duration: Duration);

    /// Called when producing a token failed.
    fn failed(&self, token: &Token, error: &DiError) {
        let _ = (token, error);
    }
}

/// Collection of observers shared by a container lineage.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn resolving(&self, token: &Token, lifetime: Lifetime) {
        for observer in &self.observers {
            observer.resolving(token, lifetime);
        }
    }

    pub(crate) fn resolved(&self, token: &Token, lifetime: Lifetime, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(token, lifetime, duration);
        }
    }

    pub(crate) fn failed(&self, token: &Token, error: &DiError) {
        for observer in &self.observers {
            observer.failed(token, error);
        }
    }
}

/// Observer that logs resolution events through `tracing`.
///
/// Starts are logged at `TRACE`, completions at `DEBUG` and failures at
/// `WARN`, each with the container name, token and lifetime as fields.
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    container: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self::named("container")
    }

    /// Observer whose events carry `container` as a field.
    pub fn named(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, token: &Token, lifetime: Lifetime) {
        trace!(container = %self.container, token = %token, %lifetime, "resolving dependency");
    }

    fn resolved(&self, token: &Token, lifetime: Lifetime, duration: Duration) {
        debug!(
            container = %self.container,
            token = %token,
            %lifetime,
            elapsed_us = duration.as_micros() as u64,
            "resolved dependency"
        );
    }

    fn failed(&self, token: &Token, error: &DiError) {
        warn!(container = %self.container, token = %token, error = %error, "dependency resolution failed");
    }
}
