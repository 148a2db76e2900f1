// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative class bindings.
//!
//! # Example
//!
//! ```rust
//! use wirebind::{ClassBuilder, Marshallable};
//!
//! #[derive(Default)]
//! struct Foo {
//!     id: i32,
//!     name: String,
//! }
//!
//! impl Marshallable for Foo {
//!     fn canonical_name() -> &'static str {
//!         "acme::Foo"
//!     }
//!
//!     fn describe(class: &mut ClassBuilder<Self>) {
//!         class
//!             .property("id", |f| &f.id, |f| &mut f.id)
//!             .property("name", |f| &f.name, |f| &mut f.name);
//!     }
//! }
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use super::descriptor::{Capability, ClassDescriptor};
use crate::accessor::{DynamicAccessor, FieldAccessor, IndexedFieldAccessor};
use crate::marshal::{
    ArrayElement, ExternalMarshal, ExternalMarshaller, Marshaller, Streamed, StreamedMarshaller,
};
use crate::types::TypeRef;
use crate::value::{DynamicObject, Marshallable, ObjectRef, PropertyValue};

/// Binding declaration for a compiled class `T`.
pub struct ClassBuilder<T> {
    descriptor: ClassDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Marshallable> ClassBuilder<T> {
    /// Run `T::describe` and return the accumulated descriptor.
    pub(crate) fn describe() -> ClassDescriptor {
        let mut builder = Self {
            descriptor: ClassDescriptor::new(
                Arc::from(T::canonical_name()),
                Capability::Generated,
                Arc::new(|| ObjectRef::new(T::default())),
            ),
            _marker: PhantomData,
        };
        T::describe(&mut builder);
        builder.descriptor
    }

    /// Declare a property backed by a field of type `V`.
    pub fn property<V: PropertyValue>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> &mut Self {
        self.descriptor.add_property(
            name,
            V::type_ref(),
            V::nullable(),
            Arc::new(FieldAccessor::new(name, get, get_mut)),
        );
        self
    }

    /// Declare a `Vec<E>` property encoded as a primitive array and accessed
    /// through the indexed fast path.
    pub fn array_property<E: ArrayElement>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &Vec<E>,
        get_mut: fn(&mut T) -> &mut Vec<E>,
    ) -> &mut Self {
        self.descriptor.add_property(
            name,
            TypeRef::Array(E::PRIMITIVE),
            false,
            Arc::new(IndexedFieldAccessor::new(name, get, get_mut)),
        );
        self
    }

    /// Pin the legacy structural id instead of deriving it from the shape.
    pub fn legacy_id(&mut self, id: i64) -> &mut Self {
        self.descriptor.set_legacy_id(id);
        self
    }

    /// Encode the whole class with `marshaller`.
    pub fn marshaller(&mut self, marshaller: Arc<dyn Marshaller>) -> &mut Self {
        self.descriptor.set_marshaller(marshaller);
        self
    }

    /// Encode one property with `marshaller`.
    pub fn property_marshaller(&mut self, name: &str, marshaller: Arc<dyn Marshaller>) -> &mut Self {
        self.descriptor.set_property_marshaller(name, marshaller);
        self
    }

    /// `T` writes and reads its own bytes.
    pub fn streamed(&mut self) -> &mut Self
    where
        T: Streamed,
    {
        self.descriptor
            .set_capability(Capability::Streamed(Arc::new(StreamedMarshaller::<T>::new())));
        self
    }

    /// `T` writes and reads itself with access to the serialization context.
    pub fn external(&mut self) -> &mut Self
    where
        T: ExternalMarshal,
    {
        self.descriptor
            .set_capability(Capability::External(Arc::new(ExternalMarshaller::<T>::new())));
        self
    }
}

/// Binding declaration for a schema-only class backed by [`DynamicObject`].
pub struct DynamicClassBuilder {
    descriptor: ClassDescriptor,
}

impl DynamicClassBuilder {
    pub(crate) fn new(canonical_name: Arc<str>) -> Self {
        let name = canonical_name.clone();
        Self {
            descriptor: ClassDescriptor::new(
                canonical_name,
                Capability::Structural,
                Arc::new(move || DynamicObject::new(name.clone()).into_object()),
            ),
        }
    }

    pub(crate) fn into_descriptor(self) -> ClassDescriptor {
        self.descriptor
    }

    fn accessor(&self, name: &str) -> Arc<DynamicAccessor> {
        Arc::new(DynamicAccessor::new(
            Arc::from(self.descriptor.canonical_name()),
            Arc::from(name),
        ))
    }

    /// Declare a non-nullable property.
    pub fn property(&mut self, name: &str, type_ref: TypeRef) -> &mut Self {
        let accessor = self.accessor(name);
        self.descriptor.add_property(name, type_ref, false, accessor);
        self
    }

    /// Declare a property that may hold null.
    pub fn nullable_property(&mut self, name: &str, type_ref: TypeRef) -> &mut Self {
        let accessor = self.accessor(name);
        self.descriptor.add_property(name, type_ref, true, accessor);
        self
    }

    pub fn legacy_id(&mut self, id: i64) -> &mut Self {
        self.descriptor.set_legacy_id(id);
        self
    }

    pub fn marshaller(&mut self, marshaller: Arc<dyn Marshaller>) -> &mut Self {
        self.descriptor.set_marshaller(marshaller);
        self
    }

    pub fn property_marshaller(&mut self, name: &str, marshaller: Arc<dyn Marshaller>) -> &mut Self {
        self.descriptor.set_property_marshaller(name, marshaller);
        self
    }
}
