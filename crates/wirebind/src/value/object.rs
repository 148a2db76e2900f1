// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object handles with identity.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::Value;
use crate::error::{Error, Result};
use crate::registry::ClassBuilder;

/// Shared, lockable instance. Two properties holding clones of the same
/// `Shared<T>` reference one object and keep doing so after a
/// size-optimized round-trip.
pub type Shared<T> = Arc<RwLock<T>>;

/// Wrap a value into a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}

/// A Rust type the serializer can bind as a class.
///
/// Usually derived with `#[derive(Marshal)]`; a manual implementation
/// declares its properties through the [`ClassBuilder`].
///
/// `Default` is the instantiation path: decoding allocates `T::default()`
/// and then populates every declared property.
pub trait Marshallable: Any + Send + Sync + Default {
    /// Stable, process-independent name of the class.
    fn canonical_name() -> &'static str;

    /// Declare the participating properties and options.
    fn describe(class: &mut ClassBuilder<Self>);
}

/// Type-erased handle to a shared instance.
///
/// Wraps an `Arc<RwLock<T>>` together with the canonical name of `T`.
/// Cloning is cheap and preserves identity; equality is identity.
#[derive(Clone)]
pub struct ObjectRef {
    canonical_name: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    /// Allocate a new instance.
    pub fn new<T: Marshallable>(value: T) -> Self {
        Self::from_shared(shared(value))
    }

    /// Wrap an existing shared instance without copying it.
    pub fn from_shared<T: Marshallable>(shared: Shared<T>) -> Self {
        Self {
            canonical_name: Arc::from(T::canonical_name()),
            inner: shared,
        }
    }

    /// Wrap any lockable value under an explicit canonical name.
    pub fn with_name<T: Any + Send + Sync>(canonical_name: Arc<str>, value: T) -> Self {
        let inner: Shared<T> = shared(value);
        Self {
            canonical_name,
            inner,
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub(crate) fn canonical_name_arc(&self) -> Arc<str> {
        self.canonical_name.clone()
    }

    /// Typed handle to the underlying instance, if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Shared<T>> {
        self.inner.clone().downcast::<RwLock<T>>().ok()
    }

    /// Run `f` under a shared lock. `None` if the instance is not a `T`.
    pub fn read<T: Any + Send + Sync, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let lock = self.inner.downcast_ref::<RwLock<T>>()?;
        let guard = lock.read_recursive();
        Some(f(&guard))
    }

    /// Run `f` under an exclusive lock. `None` if the instance is not a `T`.
    pub fn write<T: Any + Send + Sync, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let lock = self.inner.downcast_ref::<RwLock<T>>()?;
        let mut guard = lock.write();
        Some(f(&mut guard))
    }

    pub fn is<T: Any + Send + Sync>(&self) -> bool {
        self.inner.is::<RwLock<T>>()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        self.identity() == other.identity()
    }

    /// Address of the shared allocation; stable while any clone is alive.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({}@{:#x})", self.canonical_name, self.identity())
    }
}

/// Snapshot a by-value object into a fresh instance.
pub fn object_to_value<T: Marshallable + Clone>(value: &T) -> Value {
    Value::Object(ObjectRef::new(value.clone()))
}

/// Copy a by-value object out of an instance.
pub fn object_from_value<T: Marshallable + Clone>(value: Value) -> Result<T> {
    match value {
        Value::Object(obj) => obj
            .read(|v: &T| v.clone())
            .ok_or_else(|| Error::mismatch(T::canonical_name(), obj.canonical_name())),
        Value::Null => Err(Error::null_not_allowed(T::canonical_name())),
        other => Err(Error::mismatch(T::canonical_name(), other.kind_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Probe {
        n: i32,
    }

    impl Marshallable for Probe {
        fn canonical_name() -> &'static str {
            "test::Probe"
        }

        fn describe(class: &mut ClassBuilder<Self>) {
            class.property("n", |p| &p.n, |p| &mut p.n);
        }
    }

    #[test]
    fn test_identity_survives_clone() {
        let a = ObjectRef::new(Probe { n: 1 });
        let b = a.clone();
        let c = ObjectRef::new(Probe { n: 1 });
        assert!(a.ptr_eq(&b));
        assert_ne!(a, c);
        assert_eq!(a.canonical_name(), "test::Probe");
    }

    #[test]
    fn test_downcast_and_mutate() {
        let handle = shared(Probe { n: 1 });
        let obj = ObjectRef::from_shared(handle.clone());
        obj.write(|p: &mut Probe| p.n = 9).expect("is a Probe");
        assert_eq!(handle.read().n, 9);
        assert!(obj.downcast::<Probe>().is_some());
        assert!(obj.downcast::<String>().is_none());
        assert!(obj.read(|s: &String| s.len()).is_none());
    }

    #[test]
    fn test_by_value_round_trip() {
        let value = object_to_value(&Probe { n: 5 });
        let back: Probe = object_from_value(value).expect("probe");
        assert_eq!(back, Probe { n: 5 });
        assert!(matches!(
            object_from_value::<Probe>(Value::Null),
            Err(Error::NullNotAllowed { .. })
        ));
    }
}
