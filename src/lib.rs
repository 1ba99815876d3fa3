//! # config-injector
//!
//! Name-keyed dependency resolution for application configuration and services.
//!
//! ## Features
//!
//! - **Three lifetimes**: Singleton, Scoped and Transient, plus plain value singletons
//! - **Explicit dependencies**: factories list the tokens they need next to their body
//! - **Circular dependency detection**: errors carry the full path, e.g. `d -> e -> f -> d`
//! - **Scope trees**: per-unit-of-work scopes sharing one set of singletons
//! - **Chaining**: extend a container with new definitions without losing resolved state
//! - **Validation**: check every cached singleton against its shape, with a pluggable schema validator
//!
//! ## Quick Start
//!
//! ```rust
//! use config_injector::{Container, DefinitionMap, Factory};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let mut defs = DefinitionMap::new();
//! defs.add_value("db", Database {
//!     connection_string: "postgres://localhost".to_string(),
//! });
//! defs.add_transient(
//!     "users",
//!     Factory::new(|deps, _, _| Ok(UserService { db: deps.get::<Database>("db")? }))
//!         .depends_on(["db"]),
//! );
//!
//! let container = defs.build();
//! let users = container.get::<UserService>("users").unwrap();
//! assert_eq!(users.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: Created once and shared by the container and all of its scopes
//! - **Scoped**: Created once per container; every scope gets its own
//! - **Transient**: Created fresh on every resolution
//!
//! ## Validation
//!
//! ```rust
//! use config_injector::{Container, Definition, DefinitionMap, Predicate, Shape};
//!
//! let mut defs = DefinitionMap::new();
//! defs.add("port", Definition::value(8080u16));
//! defs.add(
//!     "workers",
//!     Definition::value(0usize).with_shape(Shape::schema(
//!         Predicate::matching::<usize, _>("at least one worker", |n| *n > 0),
//!     )),
//! );
//!
//! let err = Container::from_definitions(defs)
//!     .validate_config_singletons("app")
//!     .unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Invalid singleton configuration in app (1 issue):\n  - workers: Expected at least one worker"
//! );
//! ```

pub mod collection;
pub mod config;
pub mod context;
pub mod definition;
pub mod error;
pub mod instance;
pub mod lifetime;
pub mod observer;
pub mod provider;
pub mod shape;
pub mod token;
pub mod validation;
pub mod validator;

mod internal;

pub use collection::DefinitionMap;
pub use config::ContainerOptions;
pub use context::Context;
pub use definition::{Definition, Dependencies, DependencyParam, Factory, FactoryFn, Provision, NO_DEPENDENCIES};
pub use error::{DiError, DiResult};
pub use instance::Instance;
pub use internal::extract_dependency_names;
pub use lifetime::Lifetime;
pub use observer::{DiObserver, LoggingObserver};
pub use provider::{Container, ContainerBuilder, ResolverContext, ScopedResolver};
pub use shape::{Schema, Shape};
pub use token::{Token, Tokens};
pub use validation::{Unvalidated, Validated, ValidatedContainer, ValidationIssue};
pub use validator::{ObjectPredicate, Predicate, PredicateValidator, Record, SchemaValidator};
