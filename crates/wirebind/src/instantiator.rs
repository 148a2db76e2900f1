// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Zero-value instance allocation for decoding.

use crate::registry::ClassSchema;
use crate::value::ObjectRef;

/// Allocates an empty instance of an object class before its properties are
/// decoded.
///
/// Returning `None` aborts the decode of that node with
/// [`Error::InstantiationFailed`](crate::Error::InstantiationFailed).
pub trait ObjectInstantiator: Send + Sync {
    fn new_instance(&self, schema: &ClassSchema) -> Option<ObjectRef>;
}

/// Uses the factory captured at registration: `T::default()` for compiled
/// classes, an empty [`DynamicObject`](crate::DynamicObject) for dynamic ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultInstantiator;

impl ObjectInstantiator for DefaultInstantiator {
    fn new_instance(&self, schema: &ClassSchema) -> Option<ObjectRef> {
        schema.new_instance()
    }
}
