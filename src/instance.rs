//! Type-erased resolved values.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// A resolved dependency value.
///
/// Instances are shared pointers: cloning an `Instance` never clones the
/// value, and two instances are "the same" when they point at the same
/// allocation. The concrete type name is captured when the instance is
/// created so validation can report what was actually produced.
///
/// # Examples
///
/// ```rust
/// use config_injector::Instance;
/// use std::sync::Arc;
///
/// let instance = Instance::new(String::from("a"));
/// let copy = instance.clone();
/// assert!(instance.ptr_eq(&copy));
///
/// let text: Arc<String> = instance.downcast().unwrap();
/// assert_eq!(*text, "a");
/// assert!(instance.downcast::<u32>().is_none());
/// ```
#[derive(Clone)]
pub struct Instance {
    value: AnyArc,
    type_name: &'static str,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an existing shared value without reallocating it.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.value.clone().downcast::<T>().ok()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value_type_id() == TypeId::of::<T>()
    }

    /// `TypeId` of the stored value (not of the `Arc` around it).
    pub fn value_type_id(&self) -> TypeId {
        Any::type_id(&*self.value)
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.value) as *const (),
            Arc::as_ptr(&other.value) as *const (),
        )
    }

    pub fn as_any(&self) -> &(dyn Any + Send + Sync) {
        &*self.value
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .field("ptr", &(Arc::as_ptr(&self.value) as *const ()))
            .finish()
    }
}
