// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Self-describing classes.
//!
//! Both kinds keep the object framing (reference id in size-optimized mode)
//! and hand the body to the type itself. Decoding fills a fresh
//! `T::default()` and then moves it into the registered instance, so no lock
//! is held while nested values are decoded.

use std::marker::PhantomData;

use super::class::{read_object, write_object};
use super::{ExternalMarshal, Marshaller, Streamed};
use crate::accessor::wrong_target;
use crate::context::SerializationContext;
use crate::error::Result;
use crate::io::{DataInput, DataOutput};
use crate::types::TypeRef;
use crate::value::{Marshallable, ObjectRef, Value};

fn store<T: Marshallable>(obj: &ObjectRef, value: T) -> Result<()> {
    obj.write(|slot: &mut T| *slot = value)
        .ok_or_else(|| wrong_target(T::canonical_name(), obj))
}

fn accepts_class<T: Marshallable>(type_ref: &TypeRef) -> bool {
    matches!(type_ref, TypeRef::Class(name) if &**name == T::canonical_name())
}

/// Marshaller for a [`Streamed`] class.
pub struct StreamedMarshaller<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Marshallable + Streamed> StreamedMarshaller<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Marshallable + Streamed> Default for StreamedMarshaller<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Marshallable + Streamed> Marshaller for StreamedMarshaller<T> {
    fn name(&self) -> &str {
        T::canonical_name()
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        accepts_class::<T>(type_ref)
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        write_object(T::canonical_name(), value, out, ctx, |obj, out, _ctx| {
            obj.read(|t: &T| t.write_stream(out))
                .ok_or_else(|| wrong_target(T::canonical_name(), obj))?
        })
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        let schema = ctx.schema(T::canonical_name())?;
        read_object(&schema, input, ctx, |obj, input, _ctx| {
            let mut fresh = T::default();
            fresh.read_stream(input)?;
            store(obj, fresh)
        })
    }
}

/// Marshaller for an [`ExternalMarshal`] class.
pub struct ExternalMarshaller<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Marshallable + ExternalMarshal> ExternalMarshaller<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Marshallable + ExternalMarshal> Default for ExternalMarshaller<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Marshallable + ExternalMarshal> Marshaller for ExternalMarshaller<T> {
    fn name(&self) -> &str {
        T::canonical_name()
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        accepts_class::<T>(type_ref)
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        write_object(T::canonical_name(), value, out, ctx, |obj, out, ctx| {
            obj.read(|t: &T| t.write_external(out, ctx))
                .ok_or_else(|| wrong_target(T::canonical_name(), obj))?
        })
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        let schema = ctx.schema(T::canonical_name())?;
        read_object(&schema, input, ctx, |obj, input, ctx| {
            let mut fresh = T::default();
            fresh.read_external(input, ctx)?;
            store(obj, fresh)
        })
    }
}
