//! Pluggable schema validation for singleton configuration.
//!
//! The container delegates everything it does not check itself to a
//! [`SchemaValidator`]. [`PredicateValidator`] is the validator used when
//! none is configured; it understands [`Predicate`] schemas.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::instance::Instance;
use crate::shape::{Schema, Shape};
use crate::token::Token;
use crate::validation::ValidationIssue;

/// Resolved singleton values handed to [`SchemaValidator::parse`], in
/// declaration order.
pub type Record = Vec<(Token, Instance)>;

/// Schema library adapter used by the validation pass.
///
/// The pass collects every singleton whose shape the validator recognises,
/// combines their schemas with a single [`schemify`](Self::schemify) call
/// and checks all values with a single [`parse`](Self::parse) call.
pub trait SchemaValidator: Send + Sync {
    /// Whether this validator can check values of `shape`.
    fn is_schema(&self, shape: &Shape) -> bool;

    /// Combines per-token schemas into one object schema.
    fn schemify(&self, fields: Vec<(Token, Schema)>) -> Schema;

    /// Checks `record` against a schema returned by `schemify`.
    ///
    /// Issue paths start with the offending token.
    fn parse(&self, schema: &Schema, record: &Record) -> Result<Record, Vec<ValidationIssue>>;
}

type CheckFn = dyn Fn(&Instance) -> Result<(), String> + Send + Sync;

/// A named check over a resolved value.
///
/// # Examples
///
/// ```rust
/// use config_injector::{Instance, Predicate};
///
/// let port = Predicate::matching::<u16, _>("a non-zero port", |p| *p != 0);
/// assert!(port.check(&Instance::new(8080u16)).is_ok());
/// assert_eq!(
///     port.check(&Instance::new(0u16)).unwrap_err(),
///     "Expected a non-zero port"
/// );
/// assert_eq!(
///     port.check(&Instance::new("8080")).unwrap_err(),
///     "Expected u16, received &str"
/// );
/// ```
#[derive(Clone)]
pub struct Predicate {
    description: String,
    check: Arc<CheckFn>,
}

impl Predicate {
    pub fn new<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Instance) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            check: Arc::new(check),
        }
    }

    /// Accepts any value of type `T`.
    pub fn of_type<T: Any + Send + Sync>() -> Self {
        Self::new(std::any::type_name::<T>(), |instance| {
            if instance.is::<T>() {
                Ok(())
            } else {
                Err(mismatch::<T>(instance))
            }
        })
    }

    /// Accepts values of type `T` for which `test` holds.
    pub fn matching<T, F>(description: impl Into<String>, test: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let description = description.into();
        let expected = description.clone();
        Self::new(description, move |instance| {
            let value = instance
                .as_any()
                .downcast_ref::<T>()
                .ok_or_else(|| mismatch::<T>(instance))?;
            if test(value) {
                Ok(())
            } else {
                Err(format!("Expected {}", expected))
            }
        })
    }

    pub fn check(&self, instance: &Instance) -> Result<(), String> {
        (self.check)(instance)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.description).finish()
    }
}

fn mismatch<T>(instance: &Instance) -> String {
    format!(
        "Expected {}, received {}",
        std::any::type_name::<T>(),
        instance.type_name()
    )
}

/// Object schema produced by [`PredicateValidator::schemify`].
#[derive(Debug, Clone, Default)]
pub struct ObjectPredicate {
    fields: Vec<(Token, Predicate)>,
}

/// Validator for [`Predicate`] schemas.
///
/// # Examples
///
/// ```rust
/// use config_injector::{Container, DefinitionMap, Definition, Predicate, Shape};
///
/// let mut defs = DefinitionMap::new();
/// defs.add(
///     "retries",
///     Definition::value(9u8).with_shape(Shape::schema(
///         Predicate::matching::<u8, _>("at most 5 retries", |n| *n <= 5),
///     )),
/// );
///
/// let issues = Container::from_definitions(defs)
///     .safe_validate_config_singletons()
///     .unwrap_err();
/// assert_eq!(issues[0].to_string(), "retries: Expected at most 5 retries");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateValidator;

impl PredicateValidator {
    pub fn new() -> Self {
        PredicateValidator
    }
}

impl SchemaValidator for PredicateValidator {
    fn is_schema(&self, shape: &Shape) -> bool {
        shape.as_schema().is_some_and(|schema| schema.is::<Predicate>())
    }

    fn schemify(&self, fields: Vec<(Token, Schema)>) -> Schema {
        let fields = fields
            .into_iter()
            .filter_map(|(token, schema)| {
                schema
                    .downcast_ref::<Predicate>()
                    .map(|predicate| (token, predicate.clone()))
            })
            .collect();
        Schema::new(ObjectPredicate { fields })
    }

    fn parse(&self, schema: &Schema, record: &Record) -> Result<Record, Vec<ValidationIssue>> {
        let object = schema.downcast_ref::<ObjectPredicate>().ok_or_else(|| {
            vec![ValidationIssue::new(
                Vec::new(),
                format!("Unsupported schema {}", schema.type_name()),
            )]
        })?;

        let mut issues = Vec::new();
        for (token, predicate) in &object.fields {
            match record.iter().find(|(t, _)| t == token) {
                Some((_, instance)) => {
                    if let Err(message) = predicate.check(instance) {
                        issues.push(ValidationIssue::at(token.as_str(), message));
                    }
                }
                None => issues.push(ValidationIssue::at(
                    token.as_str(),
                    format!("Expected {}, received nothing", predicate.description()),
                )),
            }
        }

        if issues.is_empty() {
            Ok(record.clone())
        } else {
            Err(issues)
        }
    }
}
