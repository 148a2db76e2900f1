// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Serializer façade
//!
//! A [`Serializer`] is built once from declared bindings and then shared
//! across threads. Every call takes one snapshot of the active
//! class-definition container and runs in its own
//! [`SerializationContext`].
//!
//! ```text
//! value --runtime type--> class id --> [i64 id] --> marshaller payload
//! ```
//!
//! The four sink flavors (byte vector, `io::Write`, `fmt::Write`, fixed
//! buffer) all funnel into [`Serializer::serialize`]; decoding mirrors them
//! through [`Serializer::deserialize`].

use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::{ComparisonStrategy, SerializationStrategy, SerializerConfig};
use crate::context::SerializationContext;
use crate::error::{Error, Result};
use crate::instantiator::{DefaultInstantiator, ObjectInstantiator};
use crate::io::{DataInput, DataOutput, TextSink, TextSource};
use crate::marshal::{Marshaller, MarshallerStrategy};
use crate::registry::{
    verify, write_dump, ClassBuilder, ClassDefinitionContainer, ClassDescriptor, ClassSchema,
    DynamicClassBuilder, EnumDescriptor, SchemaTable,
};
use crate::types::TypeRef;
use crate::value::{MarshalEnum, Marshallable, PropertyValue, Value};

enum Declaration {
    Class(ClassDescriptor),
    Enum(EnumDescriptor),
}

impl Declaration {
    fn finish(self) -> Result<ClassSchema> {
        match self {
            Declaration::Class(d) => d.finish(),
            Declaration::Enum(d) => d.finish(),
        }
    }
}

/// Declares classes and options, then freezes them into a [`Serializer`].
///
/// Declaration problems (duplicate bindings, unknown property types,
/// incompatible overrides) are reported by [`SerializerBuilder::build`].
pub struct SerializerBuilder {
    config: SerializerConfig,
    declarations: Vec<Declaration>,
    overrides: Vec<(TypeRef, Arc<dyn Marshaller>)>,
    instantiator: Arc<dyn ObjectInstantiator>,
}

impl SerializerBuilder {
    fn new() -> Self {
        Self {
            config: SerializerConfig::default(),
            declarations: Vec::new(),
            overrides: Vec::new(),
            instantiator: Arc::new(DefaultInstantiator),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SerializerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn strategy(mut self, strategy: SerializationStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn comparison(mut self, comparison: ComparisonStrategy) -> Self {
        self.config.comparison = comparison;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn debug_dump_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.debug_dump_path = Some(path.into());
        self
    }

    /// Bind a compiled class.
    pub fn register<T: Marshallable>(mut self) -> Self {
        self.declarations
            .push(Declaration::Class(ClassBuilder::<T>::describe()));
        self
    }

    /// Bind a Rust enum.
    pub fn register_enum<E: MarshalEnum>(self) -> Self {
        self.register_enum_constants(E::canonical_name(), E::constants())
    }

    /// Bind an enum class by name and constants, in declaration order.
    pub fn register_enum_constants(mut self, canonical_name: &str, constants: &[&str]) -> Self {
        self.declarations.push(Declaration::Enum(EnumDescriptor::new(
            Arc::from(canonical_name),
            constants.iter().map(|&c| Arc::from(c)).collect(),
        )));
        self
    }

    /// Bind a schema-only class whose instances are [`DynamicObject`](crate::DynamicObject)s.
    pub fn register_dynamic(
        mut self,
        canonical_name: &str,
        describe: impl FnOnce(&mut DynamicClassBuilder),
    ) -> Self {
        let mut class = DynamicClassBuilder::new(Arc::from(canonical_name));
        describe(&mut class);
        self.declarations
            .push(Declaration::Class(class.into_descriptor()));
        self
    }

    /// Encode every value of exactly `type_ref` with `marshaller`.
    pub fn marshaller_override(mut self, type_ref: TypeRef, marshaller: Arc<dyn Marshaller>) -> Self {
        self.overrides.push((type_ref, marshaller));
        self
    }

    pub fn instantiator(mut self, instantiator: Arc<dyn ObjectInstantiator>) -> Self {
        self.instantiator = instantiator;
        self
    }

    /// Finalize every declaration and bind every property.
    pub fn build(self) -> Result<Serializer> {
        self.config.validate()?;

        let mut table = SchemaTable::with_builtins();
        for declaration in self.declarations {
            let schema = declaration.finish()?;
            log::debug!(
                "[registry] bound {} id={:#018x} checksum={}",
                schema.canonical_name(),
                schema.definition().id(),
                schema.definition().checksum_hex()
            );
            table.insert(schema)?;
        }

        let marshallers = MarshallerStrategy::new(table, self.overrides)?;
        let local = marshallers.local_definitions().clone();
        log::debug!(
            "[serializer] built: classes={} strategy={:?} comparison={:?}",
            local.len(),
            self.config.strategy,
            self.config.comparison
        );

        let inner = Inner {
            active: ArcSwap::from_pointee(local),
            marshallers,
            instantiator: self.instantiator,
            config: self.config,
        };
        inner.dump("local");
        Ok(Serializer {
            inner: Arc::new(inner),
        })
    }
}

impl fmt::Debug for SerializerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerBuilder")
            .field("config", &self.config)
            .field("declarations", &self.declarations.len())
            .field("overrides", &self.overrides.len())
            .finish_non_exhaustive()
    }
}

struct Inner {
    marshallers: MarshallerStrategy,
    active: ArcSwap<ClassDefinitionContainer>,
    instantiator: Arc<dyn ObjectInstantiator>,
    config: SerializerConfig,
}

impl Inner {
    fn dump(&self, label: &str) {
        if let Some(path) = &self.config.debug_dump_path {
            if let Err(e) = write_dump(path, label, &self.active.load()) {
                log::warn!("[serializer] class dump to {} failed: {}", path.display(), e);
            }
        }
    }
}

/// Thread-safe, cheaply cloneable serialization engine.
#[derive(Clone)]
pub struct Serializer {
    inner: Arc<Inner>,
}

impl Serializer {
    pub fn builder() -> SerializerBuilder {
        SerializerBuilder::new()
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.inner.config
    }

    fn context(&self) -> SerializationContext<'_> {
        SerializationContext::new(
            &self.inner.marshallers,
            self.inner.active.load_full(),
            self.inner.instantiator.as_ref(),
            self.inner.config.strategy,
            self.inner.config.max_depth,
        )
    }

    // ========================================================================
    // Serialize
    // ========================================================================

    /// Write `[class id][payload]` for a non-null value.
    pub fn serialize(&self, value: &Value, out: &mut DataOutput<'_>) -> Result<()> {
        if value.is_null() {
            return Err(Error::null_not_allowed("top-level value"));
        }
        log::trace!("[serializer] serialize {}", value.kind_name());
        self.context().write_typed(value, out)
    }

    pub fn to_bytes(&self, value: &Value) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.serialize(value, &mut DataOutput::new(&mut buf))?;
        Ok(buf)
    }

    pub fn serialize_to_stream(&self, value: &Value, sink: &mut dyn Write) -> Result<()> {
        let mut out = DataOutput::new(sink);
        self.serialize(value, &mut out)?;
        out.flush()
    }

    /// Write each byte as the `char` with the same code point.
    pub fn serialize_to_text(&self, value: &Value, sink: &mut dyn fmt::Write) -> Result<()> {
        let mut text = TextSink::new(sink);
        self.serialize(value, &mut DataOutput::new(&mut text))
    }

    /// Serialize into a fixed buffer; returns the number of bytes written.
    ///
    /// A buffer that is too small fails with [`Error::Io`].
    pub fn serialize_into(&self, value: &Value, buf: &mut [u8]) -> Result<usize> {
        let mut cursor: &mut [u8] = buf;
        let mut out = DataOutput::new(&mut cursor);
        self.serialize(value, &mut out)?;
        Ok(out.written())
    }

    /// Serialize any typed value.
    pub fn encode<T: PropertyValue>(&self, value: &T) -> Result<Vec<u8>> {
        self.to_bytes(&value.to_value())
    }

    // ========================================================================
    // Deserialize
    // ========================================================================

    /// Read one value written by [`Serializer::serialize`].
    pub fn deserialize(&self, input: &mut DataInput<'_>) -> Result<Value> {
        log::trace!("[serializer] deserialize at offset {}", input.offset());
        self.context().read_typed(input)
    }

    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Value> {
        self.deserialize_from(bytes).map(|(value, _)| value)
    }

    pub fn deserialize_from_stream(&self, source: &mut dyn Read) -> Result<Value> {
        self.deserialize(&mut DataInput::new(source))
    }

    pub fn deserialize_from_text(&self, text: &str) -> Result<Value> {
        let mut source = TextSource::new(text);
        self.deserialize(&mut DataInput::new(&mut source))
    }

    /// Deserialize from a fixed buffer; returns the value and the number of
    /// bytes consumed.
    pub fn deserialize_from(&self, buf: &[u8]) -> Result<(Value, usize)> {
        let mut cursor = buf;
        let mut input = DataInput::new(&mut cursor);
        let value = self.deserialize(&mut input)?;
        Ok((value, input.offset()))
    }

    /// Deserialize any typed value.
    pub fn decode<T: PropertyValue>(&self, bytes: &[u8]) -> Result<T> {
        T::from_value(self.from_bytes(bytes)?)
    }

    // ========================================================================
    // Class definitions
    // ========================================================================

    /// Snapshot of the active container.
    pub fn class_definition_container(&self) -> Arc<ClassDefinitionContainer> {
        self.inner.active.load_full()
    }

    /// Definitions computed from the local bindings, unaffected by swaps.
    pub fn local_class_definitions(&self) -> &ClassDefinitionContainer {
        self.inner.marshallers.local_definitions()
    }

    /// Verify a peer's container and, if consistent, make it the active one.
    ///
    /// On failure the active container is left untouched.
    pub fn set_class_definition_container(&self, remote: ClassDefinitionContainer) -> Result<()> {
        let comparison = self.inner.config.comparison;
        if let Err(e) = verify(self.local_class_definitions(), &remote, comparison) {
            log::debug!("[serializer] rejected peer container ({:?}): {}", comparison, e);
            return Err(e);
        }
        log::debug!(
            "[serializer] accepted peer container: classes={} comparison={:?}",
            remote.len(),
            comparison
        );
        self.inner.active.store(Arc::new(remote));
        self.inner.dump("active");
        Ok(())
    }

    /// Local schema of a bound class.
    pub fn class_schema(&self, canonical_name: &str) -> Option<Arc<ClassSchema>> {
        self.inner.marshallers.schema(canonical_name).cloned()
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("config", &self.inner.config)
            .field("marshallers", &self.inner.marshallers)
            .field("active", &self.inner.active.load().len())
            .finish()
    }
}
