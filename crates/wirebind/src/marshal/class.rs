// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object classes.
//!
//! ```text
//! object : [i64 ref id]? property*           ref id only when size-optimized
//! back-reference : [i64 ref id]              instance already seen in this call
//! property : [null flag]? payload            flag only for nullable properties
//! ```
//!
//! Properties appear in name order. On decode the instance is allocated and
//! registered before its properties are read, so a property may point back
//! at an enclosing instance.

use std::sync::{Arc, Weak};

use super::Marshaller;
use crate::accessor::PropertyAccessor;
use crate::context::{ObjectReference, SerializationContext};
use crate::error::{Error, Result};
use crate::io::{DataInput, DataOutput};
use crate::registry::{ClassSchema, PropertyDescriptor, PropertyPlan};
use crate::types::{Primitive, TypeRef};
use crate::value::{ObjectRef, Value};

/// Frame the payload of an object of class `canonical_name`.
pub(crate) fn write_object(
    canonical_name: &str,
    value: &Value,
    out: &mut DataOutput<'_>,
    ctx: &mut SerializationContext<'_>,
    body: impl FnOnce(&ObjectRef, &mut DataOutput<'_>, &mut SerializationContext<'_>) -> Result<()>,
) -> Result<()> {
    let obj = match value {
        Value::Object(obj) if obj.canonical_name() == canonical_name => obj,
        Value::Null => return Err(Error::null_not_allowed(canonical_name)),
        other => return Err(Error::mismatch(canonical_name, other.kind_name())),
    };
    if ctx.tracks_references() {
        match ctx.reference_for(obj) {
            ObjectReference::Known(id) => return out.write_i64(id),
            ObjectReference::New(id) => out.write_i64(id)?,
        }
    }
    body(obj, out, ctx)
}

/// Read an object framed by [`write_object`]; `body` populates the fresh instance.
pub(crate) fn read_object(
    schema: &ClassSchema,
    input: &mut DataInput<'_>,
    ctx: &mut SerializationContext<'_>,
    body: impl FnOnce(&ObjectRef, &mut DataInput<'_>, &mut SerializationContext<'_>) -> Result<()>,
) -> Result<Value> {
    if ctx.tracks_references() {
        let offset = input.offset();
        let id = input.read_i64()?;
        if let Some(existing) = ctx.resolve_reference(id, offset)? {
            if existing.canonical_name() != schema.canonical_name() {
                return Err(Error::mismatch(
                    schema.canonical_name(),
                    existing.canonical_name(),
                ));
            }
            return Ok(Value::Object(existing));
        }
        let obj = ctx.instantiate(schema)?;
        ctx.register_read(obj.clone());
        body(&obj, input, ctx)?;
        return Ok(Value::Object(obj));
    }
    let obj = ctx.instantiate(schema)?;
    body(&obj, input, ctx)?;
    Ok(Value::Object(obj))
}

fn property_path(property: &PropertyDescriptor) -> String {
    format!("{}::{}", property.declaring_type(), property.name())
}

/// Write every property of `obj` in wire order.
///
/// With `fast` set, non-null primitives and primitive arrays skip `Value`
/// and go through the accessor's typed paths.
pub(crate) fn write_properties(
    schema: &ClassSchema,
    obj: &ObjectRef,
    out: &mut DataOutput<'_>,
    ctx: &mut SerializationContext<'_>,
    fast: bool,
) -> Result<()> {
    for property in schema.properties() {
        let binding = property.binding()?;
        let accessor = property.accessor();
        let indexed = accessor.as_indexed();
        match (fast, binding.plan, indexed) {
            (true, PropertyPlan::Primitive(p), _) => write_unboxed(p, accessor.as_ref(), obj, out)?,
            (true, PropertyPlan::PrimitiveArray, Some(indexed)) => indexed.write_elements(obj, out)?,
            _ => {
                let value = accessor.read(obj)?;
                if property.is_nullable() {
                    out.write_null_flag(value.is_null())?;
                    if value.is_null() {
                        continue;
                    }
                } else if value.is_null() {
                    return Err(Error::null_not_allowed(property_path(property)));
                }
                ctx.marshall_nested(binding.marshaller.as_ref(), &value, out)?;
            }
        }
    }
    Ok(())
}

/// Read every property written by [`write_properties`] into `obj`.
pub(crate) fn read_properties(
    schema: &ClassSchema,
    obj: &ObjectRef,
    input: &mut DataInput<'_>,
    ctx: &mut SerializationContext<'_>,
    fast: bool,
) -> Result<()> {
    for property in schema.properties() {
        let binding = property.binding()?;
        let accessor = property.accessor();
        let indexed = accessor.as_indexed();
        match (fast, binding.plan, indexed) {
            (true, PropertyPlan::Primitive(p), _) => read_unboxed(p, accessor.as_ref(), obj, input)?,
            (true, PropertyPlan::PrimitiveArray, Some(indexed)) => indexed.read_elements(obj, input)?,
            _ => {
                let value = if property.is_nullable() && input.read_null_flag()? {
                    Value::Null
                } else {
                    ctx.unmarshall_nested(binding.marshaller.as_ref(), input)?
                };
                accessor.write(obj, value)?;
            }
        }
    }
    Ok(())
}

fn write_unboxed(
    primitive: Primitive,
    accessor: &dyn PropertyAccessor,
    obj: &ObjectRef,
    out: &mut DataOutput<'_>,
) -> Result<()> {
    match primitive {
        Primitive::Bool => out.write_bool(accessor.read_bool(obj)?),
        Primitive::Byte => out.write_i8(accessor.read_byte(obj)?),
        Primitive::Char => out.write_char(accessor.read_char(obj)?),
        Primitive::Short => out.write_i16(accessor.read_short(obj)?),
        Primitive::Int => out.write_i32(accessor.read_int(obj)?),
        Primitive::Long => out.write_i64(accessor.read_long(obj)?),
        Primitive::Float => out.write_f32(accessor.read_float(obj)?),
        Primitive::Double => out.write_f64(accessor.read_double(obj)?),
    }
}

fn read_unboxed(
    primitive: Primitive,
    accessor: &dyn PropertyAccessor,
    obj: &ObjectRef,
    input: &mut DataInput<'_>,
) -> Result<()> {
    match primitive {
        Primitive::Bool => accessor.write_bool(obj, input.read_bool()?),
        Primitive::Byte => accessor.write_byte(obj, input.read_i8()?),
        Primitive::Char => accessor.write_char(obj, input.read_char()?),
        Primitive::Short => accessor.write_short(obj, input.read_i16()?),
        Primitive::Int => accessor.write_int(obj, input.read_i32()?),
        Primitive::Long => accessor.write_long(obj, input.read_i64()?),
        Primitive::Float => accessor.write_float(obj, input.read_f32()?),
        Primitive::Double => accessor.write_double(obj, input.read_f64()?),
    }
}

/// Per-class marshaller over compiled accessors.
///
/// Holds its schema weakly: the schema table owns schemas, and schemas may
/// in turn hold marshallers.
pub struct ClassMarshaller {
    schema: Weak<ClassSchema>,
    canonical_name: Arc<str>,
}

impl ClassMarshaller {
    pub fn new(schema: &Arc<ClassSchema>) -> Self {
        Self {
            schema: Arc::downgrade(schema),
            canonical_name: Arc::from(schema.canonical_name()),
        }
    }

    fn schema(&self) -> Result<Arc<ClassSchema>> {
        self.schema
            .upgrade()
            .ok_or_else(|| Error::UnregisteredType(self.canonical_name.to_string()))
    }
}

impl Marshaller for ClassMarshaller {
    fn name(&self) -> &str {
        &self.canonical_name
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        matches!(type_ref, TypeRef::Class(name) if *name == self.canonical_name)
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        let schema = self.schema()?;
        write_object(&self.canonical_name, value, out, ctx, |obj, out, ctx| {
            write_properties(&schema, obj, out, ctx, true)
        })
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        let schema = self.schema()?;
        read_object(&schema, input, ctx, |obj, input, ctx| {
            read_properties(&schema, obj, input, ctx, true)
        })
    }
}

impl std::fmt::Debug for ClassMarshaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClassMarshaller({})", self.canonical_name)
    }
}
