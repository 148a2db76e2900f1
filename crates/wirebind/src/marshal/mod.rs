// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Marshallers
//!
//! A [`Marshaller`] is the byte codec for one type or type family. The
//! [`MarshallerStrategy`] picks one per [`TypeRef`](crate::TypeRef), trying in order:
//!
//! 1. [`Streamed`] types (write their own bytes)
//! 2. [`ExternalMarshal`] types (write themselves with the context)
//! 3. user overrides, global or bound on the class
//! 4. built-ins: boxed primitives, strings, big numbers, primitive arrays, enums
//! 5. `list` / `set` / `map`, bound to their element marshallers or raw
//! 6. the generated per-class marshaller
//! 7. the structural fallback for schema-only classes
//!
//! Marshallers hold no per-call state; everything call-scoped lives in the
//! [`SerializationContext`].

mod any;
mod arrays;
mod bignum;
mod class;
mod containers;
mod enums;
mod external;
mod primitives;
mod strategy;
mod strings;
mod structural;

pub use any::AnyMarshaller;
pub use arrays::{ArrayElement, ArrayMarshaller};
pub use bignum::{BigDecimalMarshaller, BigIntegerMarshaller};
pub use class::ClassMarshaller;
pub use containers::{CollectionKind, CollectionMarshaller, ElementCodec, MapMarshaller};
pub use enums::EnumMarshaller;
pub use external::{ExternalMarshaller, StreamedMarshaller};
pub use primitives::PrimitiveMarshaller;
pub use strategy::MarshallerStrategy;
pub use strings::StringMarshaller;
pub use structural::StructuralMarshaller;

use crate::context::SerializationContext;
use crate::error::Result;
use crate::io::{DataInput, DataOutput};
use crate::types::TypeRef;
use crate::value::Value;

/// Byte codec for one type or type family.
pub trait Marshaller: Send + Sync {
    /// Short name used in logs and configuration errors.
    fn name(&self) -> &str;

    /// Whether this marshaller can encode values of `type_ref`.
    fn accepts(&self, type_ref: &TypeRef) -> bool;

    /// Write the payload of `value` (no class id, no null flag).
    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()>;

    /// Read one payload written by [`Marshaller::marshall`].
    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<Value>;
}

/// A type that writes and reads its own byte representation.
///
/// Decoding instantiates `Self::default()` and calls [`Streamed::read_stream`]
/// on it.
pub trait Streamed {
    fn write_stream(&self, out: &mut DataOutput<'_>) -> Result<()>;
    fn read_stream(&mut self, input: &mut DataInput<'_>) -> Result<()>;
}

/// A type that writes and reads itself with access to the serialization
/// context, so it can nest arbitrary values (`ctx.write_value`).
pub trait ExternalMarshal {
    fn write_external(
        &self,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()>;

    fn read_external(
        &mut self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()>;
}
