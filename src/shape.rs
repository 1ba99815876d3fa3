//! Validation shape descriptors.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::instance::AnyArc;

/// Opaque schema understood by a [`SchemaValidator`](crate::SchemaValidator).
///
/// The container never looks inside a schema; it only forwards it to the
/// validator that was configured for the container.
#[derive(Clone)]
pub struct Schema {
    inner: AnyArc,
    type_name: &'static str,
}

impl Schema {
    pub fn new<S: Any + Send + Sync>(schema: S) -> Self {
        Self {
            inner: Arc::new(schema),
            type_name: std::any::type_name::<S>(),
        }
    }

    pub fn downcast_ref<S: Any>(&self) -> Option<&S> {
        self.inner.downcast_ref::<S>()
    }

    pub fn is<S: Any>(&self) -> bool {
        self.inner.is::<S>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Schema").field(&self.type_name).finish()
    }
}

/// Declared shape of a dependency, used only by the validation pass.
#[derive(Clone, Debug)]
pub enum Shape {
    /// Value must be exactly this concrete type
    Instance {
        type_id: TypeId,
        type_name: &'static str,
    },
    /// Value is checked by the container's schema validator
    Schema(Schema),
    /// Value is never checked
    Unchecked,
}

impl Shape {
    /// Constructor-like marker for `T`.
    pub fn instance_of<T: Any>() -> Self {
        Shape::Instance {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn schema<S: Any + Send + Sync>(schema: S) -> Self {
        Shape::Schema(Schema::new(schema))
    }

    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            Shape::Schema(schema) => Some(schema),
            _ => None,
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Shape::Instance { type_name, .. } => *type_name,
            Shape::Schema(schema) => schema.type_name(),
            Shape::Unchecked => "unchecked",
        }
    }
}
