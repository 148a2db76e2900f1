// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-call serialization state.
//!
//! One [`SerializationContext`] lives for exactly one top-level serialize or
//! deserialize call. It carries the class-definition snapshot taken at call
//! start, the reference tables of the size-optimized strategy, and the
//! nesting depth guard.
//!
//! Reference ids start at [`REFERENCE_ID_BASE`] and grow by one per distinct
//! instance, in encounter order, on both sides. The reader therefore knows
//! the only id a new instance may carry and rejects anything else.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::SerializationStrategy;
use crate::error::{Error, Result};
use crate::instantiator::ObjectInstantiator;
use crate::io::{DataInput, DataOutput};
use crate::marshal::{Marshaller, MarshallerStrategy};
use crate::registry::{ClassDefinitionContainer, ClassSchema};
use crate::types::TypeRef;
use crate::value::{ObjectRef, Value};

/// First reference id handed out; ids below are reserved.
pub const REFERENCE_ID_BASE: i64 = 1024;

/// Outcome of looking up an instance in the marshall-side reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectReference {
    /// First encounter in this call: write the id, then the properties.
    New(i64),
    /// Already written: the id alone stands for the instance.
    Known(i64),
}

/// Call-scoped state shared by every marshaller of one call.
pub struct SerializationContext<'a> {
    marshallers: &'a MarshallerStrategy,
    container: Arc<ClassDefinitionContainer>,
    instantiator: &'a dyn ObjectInstantiator,
    strategy: SerializationStrategy,
    max_depth: usize,
    depth: usize,
    written: HashMap<usize, i64>,
    // keeps written instances alive so their addresses stay unique
    pinned: Vec<ObjectRef>,
    read: HashMap<i64, ObjectRef>,
    next_written: i64,
    next_read: i64,
}

impl<'a> SerializationContext<'a> {
    pub(crate) fn new(
        marshallers: &'a MarshallerStrategy,
        container: Arc<ClassDefinitionContainer>,
        instantiator: &'a dyn ObjectInstantiator,
        strategy: SerializationStrategy,
        max_depth: usize,
    ) -> Self {
        Self {
            marshallers,
            container,
            instantiator,
            strategy,
            max_depth,
            depth: 0,
            written: HashMap::new(),
            pinned: Vec::new(),
            read: HashMap::new(),
            next_written: REFERENCE_ID_BASE,
            next_read: REFERENCE_ID_BASE,
        }
    }

    pub fn serialization_strategy(&self) -> SerializationStrategy {
        self.strategy
    }

    /// Whether object identity is tracked in this call.
    pub fn tracks_references(&self) -> bool {
        self.strategy == SerializationStrategy::SizeOptimized
    }

    /// Class-definition snapshot this call runs against.
    pub fn class_definitions(&self) -> &ClassDefinitionContainer {
        &self.container
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Marshaller for a declared or runtime type.
    pub fn marshaller_for(&self, type_ref: &TypeRef) -> Result<Arc<dyn Marshaller>> {
        self.marshallers.resolve(type_ref)
    }

    pub fn schema(&self, canonical_name: &str) -> Result<Arc<ClassSchema>> {
        self.marshallers
            .schema(canonical_name)
            .cloned()
            .ok_or_else(|| Error::UnregisteredType(canonical_name.to_string()))
    }

    /// Wire id of a class: the active container's, or the local one when the
    /// active container does not list the class.
    pub fn class_id(&self, canonical_name: &str) -> Result<i64> {
        if let Some(def) = self.container.by_name(canonical_name) {
            return Ok(def.id());
        }
        self.marshallers
            .local_definitions()
            .by_name(canonical_name)
            .map(|def| def.id())
            .ok_or_else(|| Error::UnregisteredType(canonical_name.to_string()))
    }

    /// Local schema for a wire id.
    pub fn schema_by_id(&self, id: i64) -> Result<Arc<ClassSchema>> {
        let def = self
            .container
            .by_id(id)
            .or_else(|| self.marshallers.local_definitions().by_id(id))
            .ok_or(Error::UnknownClassId(id))?;
        self.marshallers
            .schema(def.canonical_name())
            .cloned()
            .ok_or_else(|| Error::UnknownCanonicalName(def.canonical_name().to_string()))
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// `[class id][payload]` for a non-null value.
    pub fn write_typed(&mut self, value: &Value, out: &mut DataOutput<'_>) -> Result<()> {
        let type_ref = value
            .runtime_type()
            .ok_or_else(|| Error::null_not_allowed("typed value"))?;
        out.write_i64(self.class_id(&type_ref.canonical_name())?)?;
        let marshaller = self.marshaller_for(&type_ref)?;
        self.marshall_nested(marshaller.as_ref(), value, out)
    }

    /// `[null flag]` then, when present, `[class id][payload]`.
    pub fn write_value(&mut self, value: &Value, out: &mut DataOutput<'_>) -> Result<()> {
        out.write_null_flag(value.is_null())?;
        if value.is_null() {
            return Ok(());
        }
        self.write_typed(value, out)
    }

    /// Read a value written by [`SerializationContext::write_typed`].
    pub fn read_typed(&mut self, input: &mut DataInput<'_>) -> Result<Value> {
        let id = input.read_i64()?;
        let schema = self.schema_by_id(id)?;
        let marshaller = self.marshaller_for(&schema.type_ref())?;
        self.unmarshall_nested(marshaller.as_ref(), input)
    }

    /// Read a value written by [`SerializationContext::write_value`].
    pub fn read_value(&mut self, input: &mut DataInput<'_>) -> Result<Value> {
        if input.read_null_flag()? {
            return Ok(Value::Null);
        }
        self.read_typed(input)
    }

    /// Run `marshaller` one nesting level deeper.
    pub fn marshall_nested(
        &mut self,
        marshaller: &dyn Marshaller,
        value: &Value,
        out: &mut DataOutput<'_>,
    ) -> Result<()> {
        self.enter()?;
        let result = marshaller.marshall(value, out, self);
        self.depth -= 1;
        result
    }

    /// Run `marshaller` one nesting level deeper.
    pub fn unmarshall_nested(
        &mut self,
        marshaller: &dyn Marshaller,
        input: &mut DataInput<'_>,
    ) -> Result<Value> {
        self.enter()?;
        let result = marshaller.unmarshall(input, self);
        self.depth -= 1;
        result
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthExceeded(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    // ========================================================================
    // References
    // ========================================================================

    pub(crate) fn reference_for(&mut self, obj: &ObjectRef) -> ObjectReference {
        if let Some(&id) = self.written.get(&obj.identity()) {
            return ObjectReference::Known(id);
        }
        let id = self.next_written;
        self.next_written += 1;
        self.written.insert(obj.identity(), id);
        self.pinned.push(obj.clone());
        ObjectReference::New(id)
    }

    /// Resolve a reference id read at `offset`.
    ///
    /// `Some` for a back-reference, `None` when `id` introduces the next new
    /// instance (the caller allocates it and calls
    /// [`SerializationContext::register_read`]).
    pub(crate) fn resolve_reference(&self, id: i64, offset: usize) -> Result<Option<ObjectRef>> {
        if let Some(obj) = self.read.get(&id) {
            return Ok(Some(obj.clone()));
        }
        if id == self.next_read {
            return Ok(None);
        }
        Err(Error::InvalidReference {
            offset,
            reference: id,
        })
    }

    /// Record a freshly allocated instance under the next reference id.
    pub(crate) fn register_read(&mut self, obj: ObjectRef) {
        self.read.insert(self.next_read, obj);
        self.next_read += 1;
    }

    /// Allocate an empty instance of an object class.
    pub fn instantiate(&self, schema: &ClassSchema) -> Result<ObjectRef> {
        self.instantiator
            .new_instance(schema)
            .ok_or_else(|| Error::InstantiationFailed(schema.canonical_name().to_string()))
    }
}

impl std::fmt::Debug for SerializationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializationContext")
            .field("strategy", &self.strategy)
            .field("depth", &self.depth)
            .field("written", &self.written.len())
            .field("read", &self.read.len())
            .finish_non_exhaustive()
    }
}
