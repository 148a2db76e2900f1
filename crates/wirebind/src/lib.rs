// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # wirebind - binary object serialization
//!
//! Encodes graphs of bound objects into a compact big-endian binary format
//! and back, with a class-definition registry two peers exchange to check
//! that they agree on every class before trusting each other's bytes.
//!
//! ## Quick Start
//!
//! ```rust
//! use wirebind::{Marshal, Result, Serializer};
//!
//! #[derive(Marshal, Debug, Default, Clone, PartialEq)]
//! #[marshal(name = "acme::Foo")]
//! struct Foo {
//!     id: i32,
//!     name: String,
//! }
//!
//! fn main() -> Result<()> {
//!     let serializer = Serializer::builder().register::<Foo>().build()?;
//!
//!     let foo = Foo { id: 10000, name: "SomeName".into() };
//!     let bytes = serializer.encode(&foo)?;
//!     assert_eq!(serializer.decode::<Foo>(&bytes)?, foo);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  Serializer          builder, sinks/sources, active container |
//! +---------------------------------------------------------------+
//! |  SerializationContext   per call: references, depth, snapshot |
//! +---------------------------------------------------------------+
//! |  MarshallerStrategy  -> Marshaller (class, enum, list, ...)   |
//! +---------------------------------------------------------------+
//! |  Registry: ClassSchema / ClassDefinition / Container          |
//! |  Accessors: FieldAccessor / IndexedFieldAccessor / Dynamic    |
//! +---------------------------------------------------------------+
//! |  io: DataOutput / DataInput (big-endian, modified UTF-8)      |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Serializer`] | Entry point: serialize, deserialize, container exchange |
//! | [`Value`] | Runtime value model (primitives, containers, objects) |
//! | [`Marshallable`] | A Rust type bound as a class (usually derived) |
//! | [`ClassDefinitionContainer`] | Class ids and checksums exchanged between peers |
//! | [`Marshaller`] | Byte codec for one type or type family |
//!
//! ## Features
//!
//! - `config-loaders` (default): [`SerializerConfig`] from YAML

// Allow the derive macro to work inside this crate's tests
extern crate self as wirebind;

/// Property accessors (compiled field projection, dynamic fallback).
pub mod accessor;
/// Serializer configuration and strategies.
pub mod config;
/// Per-call serialization state.
pub mod context;
/// Error types.
pub mod error;
/// Zero-value instance allocation.
pub mod instantiator;
/// Big-endian primitive streams and text adapters.
pub mod io;
/// Marshallers and marshaller selection.
pub mod marshal;
/// Class definitions, schemas and the consistency protocol.
pub mod registry;
/// Serializer façade.
pub mod serializer;
/// Declared types.
pub mod types;
/// Runtime value model.
pub mod value;

pub use accessor::{
    DynamicAccessor, FieldAccessor, IndexedFieldAccessor, IndexedPropertyAccessor,
    PropertyAccessor,
};
pub use config::{ComparisonStrategy, SerializationStrategy, SerializerConfig};
pub use context::{SerializationContext, REFERENCE_ID_BASE};
pub use error::{Error, ErrorKind, Result};
pub use instantiator::{DefaultInstantiator, ObjectInstantiator};
pub use io::{DataInput, DataOutput};
pub use marshal::{ExternalMarshal, Marshaller, Streamed};
pub use registry::{
    ClassBuilder, ClassDefinition, ClassDefinitionContainer, ClassSchema, DynamicClassBuilder,
    PropertyDescriptor,
};
pub use serializer::{Serializer, SerializerBuilder};
pub use types::{Primitive, TypeRef};
pub use value::{
    enum_from_value, enum_to_value, object_from_value, object_to_value, shared, BigDecimal,
    BigInteger, DynamicObject, EnumValue, MarshalEnum, Marshallable, ObjectRef, PropertyValue,
    Shared, Value,
};
pub use wirebind_codegen::Marshal;
