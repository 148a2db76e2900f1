// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Boxed primitives: fixed-width big-endian payloads.

use super::Marshaller;
use crate::context::SerializationContext;
use crate::error::{Error, Result};
use crate::io::{DataInput, DataOutput};
use crate::types::{Primitive, TypeRef};
use crate::value::Value;

/// Codec for one of the eight primitive kinds.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveMarshaller {
    primitive: Primitive,
}

impl PrimitiveMarshaller {
    pub fn new(primitive: Primitive) -> Self {
        Self { primitive }
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }
}

/// Write one primitive value; `value` must be of kind `primitive`.
pub(crate) fn write_primitive(primitive: Primitive, value: &Value, out: &mut DataOutput<'_>) -> Result<()> {
    match (primitive, value) {
        (Primitive::Bool, Value::Bool(v)) => out.write_bool(*v),
        (Primitive::Byte, Value::Byte(v)) => out.write_i8(*v),
        (Primitive::Char, Value::Char(v)) => out.write_char(*v),
        (Primitive::Short, Value::Short(v)) => out.write_i16(*v),
        (Primitive::Int, Value::Int(v)) => out.write_i32(*v),
        (Primitive::Long, Value::Long(v)) => out.write_i64(*v),
        (Primitive::Float, Value::Float(v)) => out.write_f32(*v),
        (Primitive::Double, Value::Double(v)) => out.write_f64(*v),
        (_, Value::Null) => Err(Error::null_not_allowed(primitive.name())),
        (_, other) => Err(Error::mismatch(primitive.name(), other.kind_name())),
    }
}

pub(crate) fn read_primitive(primitive: Primitive, input: &mut DataInput<'_>) -> Result<Value> {
    Ok(match primitive {
        Primitive::Bool => Value::Bool(input.read_bool()?),
        Primitive::Byte => Value::Byte(input.read_i8()?),
        Primitive::Char => Value::Char(input.read_char()?),
        Primitive::Short => Value::Short(input.read_i16()?),
        Primitive::Int => Value::Int(input.read_i32()?),
        Primitive::Long => Value::Long(input.read_i64()?),
        Primitive::Float => Value::Float(input.read_f32()?),
        Primitive::Double => Value::Double(input.read_f64()?),
    })
}

impl Marshaller for PrimitiveMarshaller {
    fn name(&self) -> &str {
        self.primitive.name()
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        *type_ref == TypeRef::Primitive(self.primitive)
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        write_primitive(self.primitive, value, out)
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        read_primitive(self.primitive, input)
    }
}
