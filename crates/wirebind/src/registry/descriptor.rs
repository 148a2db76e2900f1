// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Build-time class descriptors and their finalized property descriptors.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::checksum::{self, PropertySignature, Shape};
use super::{ClassSchema, Factory, ObjectSchema, SchemaKind};
use crate::accessor::PropertyAccessor;
use crate::error::{Error, Result};
use crate::marshal::Marshaller;
use crate::types::{Primitive, TypeRef};

/// How instances of a class reach the wire.
#[derive(Clone)]
pub enum Capability {
    /// Property-by-property, with compiled accessors.
    Generated,
    /// The type writes and reads its own bytes.
    Streamed(Arc<dyn Marshaller>),
    /// The type writes and reads itself with access to the context.
    External(Arc<dyn Marshaller>),
    /// Schema-only class, properties through the generic accessor path.
    Structural,
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Generated => f.write_str("Generated"),
            Capability::Streamed(m) => write!(f, "Streamed({})", m.name()),
            Capability::External(m) => write!(f, "External({})", m.name()),
            Capability::Structural => f.write_str("Structural"),
        }
    }
}

/// Encoding plan of one property, fixed when the registry is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropertyPlan {
    /// Non-null primitive through the accessor's unboxed fast path.
    Primitive(Primitive),
    /// Primitive array streamed through the indexed accessor.
    PrimitiveArray,
    /// Through `Value` and the resolved marshaller.
    Delegate,
}

pub(crate) struct PropertyBinding {
    pub marshaller: Arc<dyn Marshaller>,
    pub plan: PropertyPlan,
}

/// One declared property of a finalized class.
pub struct PropertyDescriptor {
    declaring_type: Arc<str>,
    name: Arc<str>,
    type_ref: TypeRef,
    nullable: bool,
    accessor: Arc<dyn PropertyAccessor>,
    override_marshaller: Option<Arc<dyn Marshaller>>,
    binding: OnceLock<PropertyBinding>,
}

impl PropertyDescriptor {
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn accessor(&self) -> &Arc<dyn PropertyAccessor> {
        &self.accessor
    }

    /// Resolved marshaller; `None` until the serializer is built.
    pub fn marshaller(&self) -> Option<&Arc<dyn Marshaller>> {
        self.binding.get().map(|b| &b.marshaller)
    }

    pub(crate) fn override_marshaller(&self) -> Option<&Arc<dyn Marshaller>> {
        self.override_marshaller.as_ref()
    }

    pub(crate) fn binding(&self) -> Result<&PropertyBinding> {
        self.binding
            .get()
            .ok_or_else(|| Error::UnregisteredType(format!("{}::{}", self.declaring_type, self.name)))
    }

    pub(crate) fn bind(&self, binding: PropertyBinding) {
        // first binding wins; build binds each property exactly once
        let _ = self.binding.set(binding);
    }

    pub(crate) fn signature(&self) -> PropertySignature<'_> {
        PropertySignature {
            name: &self.name,
            type_ref: &self.type_ref,
            nullable: self.nullable,
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("declaring_type", &self.declaring_type)
            .field("name", &self.name)
            .field("type_ref", &self.type_ref)
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}

struct DeclaredProperty {
    name: Arc<str>,
    type_ref: TypeRef,
    nullable: bool,
    accessor: Arc<dyn PropertyAccessor>,
}

/// Mutable accumulator for one class while bindings are declared.
///
/// Declaration errors are collected and surfaced by the serializer builder,
/// so builder methods can keep returning `&mut Self`.
pub struct ClassDescriptor {
    canonical_name: Arc<str>,
    properties: Vec<DeclaredProperty>,
    property_marshallers: Vec<(String, Arc<dyn Marshaller>)>,
    capability: Capability,
    legacy_id: Option<i64>,
    marshaller: Option<Arc<dyn Marshaller>>,
    factory: Factory,
    errors: Vec<Error>,
}

impl ClassDescriptor {
    pub(crate) fn new(canonical_name: Arc<str>, capability: Capability, factory: Factory) -> Self {
        Self {
            canonical_name,
            properties: Vec::new(),
            property_marshallers: Vec::new(),
            capability,
            legacy_id: None,
            marshaller: None,
            factory,
            errors: Vec::new(),
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub(crate) fn add_property(
        &mut self,
        name: &str,
        type_ref: TypeRef,
        nullable: bool,
        accessor: Arc<dyn PropertyAccessor>,
    ) {
        if self.properties.iter().any(|p| &*p.name == name) {
            self.errors.push(Error::DuplicateProperty {
                canonical_name: self.canonical_name.to_string(),
                property: name.to_string(),
            });
            return;
        }
        self.properties.push(DeclaredProperty {
            name: Arc::from(name),
            type_ref,
            nullable,
            accessor,
        });
    }

    pub(crate) fn set_property_marshaller(&mut self, name: &str, marshaller: Arc<dyn Marshaller>) {
        self.property_marshallers.push((name.to_string(), marshaller));
    }

    pub(crate) fn set_capability(&mut self, capability: Capability) {
        self.capability = capability;
    }

    pub(crate) fn set_legacy_id(&mut self, id: i64) {
        self.legacy_id = Some(id);
    }

    pub(crate) fn set_marshaller(&mut self, marshaller: Arc<dyn Marshaller>) {
        self.marshaller = Some(marshaller);
    }

    /// Freeze into a schema: properties sorted by name, definition computed.
    pub(crate) fn finish(self) -> Result<ClassSchema> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let mut overrides = self.property_marshallers;
        let mut properties: Vec<PropertyDescriptor> = self
            .properties
            .into_iter()
            .map(|p| {
                let override_marshaller = overrides
                    .iter()
                    .rposition(|(name, _)| *name == *p.name)
                    .map(|i| overrides[i].1.clone());
                PropertyDescriptor {
                    declaring_type: self.canonical_name.clone(),
                    name: p.name,
                    type_ref: p.type_ref,
                    nullable: p.nullable,
                    accessor: p.accessor,
                    override_marshaller,
                    binding: OnceLock::new(),
                }
            })
            .collect();

        overrides.retain(|(name, _)| !properties.iter().any(|p| *p.name == **name));
        if let Some((name, _)) = overrides.first() {
            return Err(Error::MissingProperty {
                canonical_name: self.canonical_name.to_string(),
                property: name.clone(),
            });
        }

        properties.sort_by(|a, b| a.name.cmp(&b.name));
        let definition = checksum::compute(
            &self.canonical_name,
            Shape::Object(properties.iter().map(PropertyDescriptor::signature).collect()),
            self.legacy_id,
        );

        Ok(ClassSchema::new(
            definition,
            SchemaKind::Object(ObjectSchema {
                capability: self.capability,
                properties,
                factory: self.factory,
                marshaller: self.marshaller,
            }),
        ))
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("canonical_name", &self.canonical_name)
            .field("properties", &self.properties.len())
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

/// Build-time description of an enum class.
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    canonical_name: Arc<str>,
    constants: Vec<Arc<str>>,
}

impl EnumDescriptor {
    pub(crate) fn new(canonical_name: Arc<str>, constants: Vec<Arc<str>>) -> Self {
        Self {
            canonical_name,
            constants,
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub(crate) fn finish(self) -> Result<ClassSchema> {
        for (i, c) in self.constants.iter().enumerate() {
            if self.constants[..i].contains(c) {
                return Err(Error::DuplicateProperty {
                    canonical_name: self.canonical_name.to_string(),
                    property: c.to_string(),
                });
            }
        }
        let definition = checksum::compute(
            &self.canonical_name,
            Shape::Enum(&self.constants),
            None,
        );
        Ok(ClassSchema::new(
            definition,
            SchemaKind::Enum {
                constants: self.constants,
            },
        ))
    }
}
