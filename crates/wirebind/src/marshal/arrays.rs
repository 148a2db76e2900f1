// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive arrays: `[i32 count][elements]`, no per-element flags.

use std::marker::PhantomData;

use super::Marshaller;
use crate::context::SerializationContext;
use crate::error::{Error, Result};
use crate::io::{DataInput, DataOutput, MAX_PREALLOC};
use crate::types::{Primitive, TypeRef};
use crate::value::{PropertyValue, Value};

/// A primitive usable as an array element.
pub trait ArrayElement: PropertyValue + Copy + Default {
    const PRIMITIVE: Primitive;

    fn write_element(self, out: &mut DataOutput<'_>) -> Result<()>;

    fn read_element(input: &mut DataInput<'_>) -> Result<Self>;

    /// Elements of a matching array value.
    fn slice_of(value: &Value) -> Option<&[Self]>;

    fn wrap(items: Vec<Self>) -> Value;
}

macro_rules! impl_array_element {
    ($ty:ty, $prim:ident, $variant:ident, $write:ident, $read:ident) => {
        impl ArrayElement for $ty {
            const PRIMITIVE: Primitive = Primitive::$prim;

            fn write_element(self, out: &mut DataOutput<'_>) -> Result<()> {
                out.$write(self)
            }

            fn read_element(input: &mut DataInput<'_>) -> Result<Self> {
                input.$read()
            }

            fn slice_of(value: &Value) -> Option<&[Self]> {
                match value {
                    Value::$variant(items) => Some(items),
                    _ => None,
                }
            }

            fn wrap(items: Vec<Self>) -> Value {
                Value::$variant(items)
            }
        }
    };
}

impl_array_element!(bool, Bool, BoolArray, write_bool, read_bool);
impl_array_element!(i8, Byte, ByteArray, write_i8, read_i8);
impl_array_element!(char, Char, CharArray, write_char, read_char);
impl_array_element!(i16, Short, ShortArray, write_i16, read_i16);
impl_array_element!(i32, Int, IntArray, write_i32, read_i32);
impl_array_element!(i64, Long, LongArray, write_i64, read_i64);
impl_array_element!(f32, Float, FloatArray, write_f32, read_f32);
impl_array_element!(f64, Double, DoubleArray, write_f64, read_f64);

/// Codec for `E[]`.
pub struct ArrayMarshaller<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E: ArrayElement> ArrayMarshaller<E> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E: ArrayElement> Default for ArrayMarshaller<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ArrayElement> Marshaller for ArrayMarshaller<E> {
    fn name(&self) -> &str {
        E::PRIMITIVE.array_name()
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        *type_ref == TypeRef::Array(E::PRIMITIVE)
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        let items = match E::slice_of(value) {
            Some(items) => items,
            None if value.is_null() => return Err(Error::null_not_allowed(self.name())),
            None => return Err(Error::mismatch(self.name(), value.kind_name())),
        };
        out.write_len(items.len())?;
        items.iter().try_for_each(|&e| e.write_element(out))
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        let len = input.read_len()?;
        let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            items.push(E::read_element(input)?);
        }
        Ok(E::wrap(items))
    }
}
