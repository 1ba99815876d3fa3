//! Validation of singleton configuration.
//!
//! Checks the cached instance of every singleton of a container against its
//! declared [`Shape`]. Validation never runs factories. A container that passes is returned as a
//! [`ValidatedContainer`], so code can require proof of validation in its
//! signatures.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DiError, DiResult};
use crate::lifetime::Lifetime;
use crate::provider::Container;
use crate::shape::Shape;
use crate::validator::Record;

/// Typestate marker: the container has not been through validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unvalidated;

/// Typestate marker: every singleton of the container passed validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validated;

/// A container whose singletons passed validation.
pub type ValidatedContainer = Container<Validated>;

/// One validation failure.
///
/// `path` starts with the token of the offending singleton; schema
/// validators may append nested field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Issue located directly at `token`.
    pub fn at(token: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![token.into()], message)
    }

    pub fn token(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

impl<State> Container<State> {
    /// Checks every cached singleton, returning all issues on failure.
    ///
    /// Singletons are visited in declaration order and read from the cache
    /// only; a factory singleton that was never resolved is reported as
    /// `Expected <type>, received nothing` on its own token and its factory
    /// is not invoked. Singletons without a checked shape are skipped. `Shape::Instance` values are checked by concrete type, shapes
    /// the configured [`SchemaValidator`](crate::SchemaValidator) recognises
    /// are checked together in one batch. Issues come back ordered by the
    /// declaration position of the token they concern.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use config_injector::{Container, Definition, DefinitionMap, Factory, Shape};
    ///
    /// let mut defs = DefinitionMap::new();
    /// defs.add_value("a", "a".to_string());
    /// defs.add(
    ///     "b",
    ///     Definition::singleton(Factory::new(|_, _, _| Ok(5u32)))
    ///         .with_shape(Shape::instance_of::<String>()),
    /// );
    ///
    /// let container = Container::from_definitions(defs);
    /// container.resolve("b").unwrap();
    ///
    /// let issues = container.safe_validate_config_singletons().unwrap_err();
    /// assert_eq!(issues.len(), 1);
    /// assert_eq!(issues[0].path, vec!["b"]);
    /// assert_eq!(issues[0].message, "Expected alloc::string::String, received u32");
    /// ```
    pub fn safe_validate_config_singletons(&self) -> Result<Container<Validated>, Vec<ValidationIssue>> {
        let inner = self.inner();
        let validator = inner.validator.as_ref();

        let mut issues = Vec::new();
        let mut schemas = Vec::new();
        let mut record = Record::new();
        let mut checked = 0usize;

        for (token, definition) in inner.definitions.iter() {
            if definition.lifetime() != Lifetime::Singleton {
                continue;
            }
            checked += 1;

            let cached = inner.cached(token);

            match definition.shape() {
                Shape::Instance { type_id, type_name } => {
                    let Some(instance) = cached else {
                        issues.push(ValidationIssue::at(
                            token.as_str(),
                            format!("Expected {}, received nothing", type_name),
                        ));
                        continue;
                    };
                    if instance.value_type_id() != *type_id {
                        issues.push(ValidationIssue::at(
                            token.as_str(),
                            format!("Expected {}, received {}", type_name, instance.type_name()),
                        ));
                    }
                }
                shape if validator.is_schema(shape) => {
                    // an uncached token stays out of the record for `parse` to report
                    if let Some(schema) = shape.as_schema() {
                        schemas.push((token.clone(), schema.clone()));
                        record.extend(cached.map(|instance| (token.clone(), instance)));
                    }
                }
                _ => {}
            }
        }

        if !schemas.is_empty() {
            let schema = validator.schemify(schemas);
            if let Err(mut found) = validator.parse(&schema, &record) {
                issues.append(&mut found);
            }
        }

        if issues.is_empty() {
            debug!(container = %inner.options.name, singletons = checked, "singleton configuration valid");
            return Ok(Container::from_inner(inner.fork(inner.definitions.clone())));
        }

        let definitions = &inner.definitions;
        issues.sort_by_key(|issue| {
            issue
                .token()
                .and_then(|token| definitions.position(token))
                .unwrap_or(usize::MAX)
        });
        warn!(
            container = %inner.options.name,
            issues = issues.len(),
            "singleton configuration invalid"
        );
        Err(issues)
    }

    /// Like [`safe_validate_config_singletons`](Self::safe_validate_config_singletons),
    /// but fails with a [`DiError::Validation`] report labelled `name`.
    pub fn validate_config_singletons(&self, name: &str) -> DiResult<Container<Validated>> {
        self.safe_validate_config_singletons()
            .map_err(|issues| DiError::Validation {
                name: name.to_string(),
                issues,
            })
    }
}
