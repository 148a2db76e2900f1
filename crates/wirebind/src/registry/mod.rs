// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Class definition registry
//!
//! Every bound type is finalized into an immutable [`ClassSchema`] carrying
//! its [`ClassDefinition`] (id, checksum, legacy id). The definitions of all
//! local schemas form the local [`ClassDefinitionContainer`], which peers
//! exchange and verify with [`verify`] before trusting each other's bytes.
//!
//! ```text
//! ClassBuilder / DynamicClassBuilder
//!        |  (declare)
//!        v
//! ClassDescriptor --finish--> ClassSchema --definition--> ClassDefinition
//!                                                           |
//!                                       ClassDefinitionContainer (wire)
//! ```

mod builder;
mod checksum;
mod consistency;
mod container;
mod definition;
mod descriptor;
mod dump;

pub use builder::{ClassBuilder, DynamicClassBuilder};
pub use consistency::verify;
pub use container::ClassDefinitionContainer;
pub use definition::ClassDefinition;
pub use descriptor::{Capability, ClassDescriptor, EnumDescriptor, PropertyDescriptor};
pub(crate) use descriptor::{PropertyBinding, PropertyPlan};
pub(crate) use dump::write_dump;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::marshal::Marshaller;
use crate::types::{Primitive, TypeRef};
use crate::value::ObjectRef;

/// Allocates a zero-value instance of a class.
pub(crate) type Factory = Arc<dyn Fn() -> ObjectRef + Send + Sync>;

/// Object-class part of a schema.
pub struct ObjectSchema {
    pub(crate) capability: Capability,
    pub(crate) properties: Vec<PropertyDescriptor>,
    pub(crate) factory: Factory,
    pub(crate) marshaller: Option<Arc<dyn Marshaller>>,
}

/// What a schema describes.
pub enum SchemaKind {
    Object(ObjectSchema),
    Enum { constants: Vec<Arc<str>> },
    /// Runtime built-in: boxed primitive, string, big number, array or container.
    Builtin(TypeRef),
}

/// Finalized, immutable binding of one class.
pub struct ClassSchema {
    definition: ClassDefinition,
    kind: SchemaKind,
}

impl ClassSchema {
    pub(crate) fn new(definition: ClassDefinition, kind: SchemaKind) -> Self {
        Self { definition, kind }
    }

    fn builtin(type_ref: TypeRef) -> Self {
        let definition = checksum::compute(&type_ref.canonical_name(), checksum::Shape::Builtin, None);
        Self::new(definition, SchemaKind::Builtin(type_ref))
    }

    pub fn canonical_name(&self) -> &str {
        self.definition.canonical_name()
    }

    pub fn definition(&self) -> &ClassDefinition {
        &self.definition
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Type of values described by this schema.
    pub fn type_ref(&self) -> TypeRef {
        match &self.kind {
            SchemaKind::Object(_) => TypeRef::Class(self.definition.canonical_name_arc().clone()),
            SchemaKind::Enum { .. } => TypeRef::Enum(self.definition.canonical_name_arc().clone()),
            SchemaKind::Builtin(type_ref) => type_ref.clone(),
        }
    }

    /// Declared properties in wire order (sorted by name); empty for non-objects.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        match &self.kind {
            SchemaKind::Object(object) => &object.properties,
            _ => &[],
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties().iter().find(|p| p.name() == name)
    }

    pub fn capability(&self) -> Option<&Capability> {
        match &self.kind {
            SchemaKind::Object(object) => Some(&object.capability),
            _ => None,
        }
    }

    pub fn constants(&self) -> Option<&[Arc<str>]> {
        match &self.kind {
            SchemaKind::Enum { constants } => Some(constants),
            _ => None,
        }
    }

    /// Class-level marshaller override, if one was bound.
    pub fn class_marshaller(&self) -> Option<&Arc<dyn Marshaller>> {
        match &self.kind {
            SchemaKind::Object(object) => object.marshaller.as_ref(),
            _ => None,
        }
    }

    /// Fresh zero-value instance from the registered factory.
    pub fn new_instance(&self) -> Option<ObjectRef> {
        match &self.kind {
            SchemaKind::Object(object) => Some((object.factory)()),
            _ => None,
        }
    }
}

impl fmt::Debug for ClassSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            SchemaKind::Object(o) => format!("Object({:?})", o.capability),
            SchemaKind::Enum { constants } => format!("Enum({} constants)", constants.len()),
            SchemaKind::Builtin(t) => format!("Builtin({})", t),
        };
        f.debug_struct("ClassSchema")
            .field("definition", &self.definition)
            .field("kind", &kind)
            .field("properties", &self.properties())
            .finish()
    }
}

/// Schemas of every class known locally, built-ins included.
#[derive(Default)]
pub(crate) struct SchemaTable {
    by_name: HashMap<Arc<str>, Arc<ClassSchema>>,
    ordered: Vec<Arc<ClassSchema>>,
}

impl SchemaTable {
    /// Table preloaded with the runtime built-ins.
    pub fn with_builtins() -> Self {
        let mut table = Self::default();
        for schema in builtin_types().into_iter().map(ClassSchema::builtin) {
            // built-in names are distinct
            let _ = table.insert(schema);
        }
        table
    }

    pub fn insert(&mut self, schema: ClassSchema) -> Result<Arc<ClassSchema>> {
        let name = schema.definition.canonical_name_arc().clone();
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateBinding {
                canonical_name: name.to_string(),
            });
        }
        let schema = Arc::new(schema);
        self.by_name.insert(name, schema.clone());
        self.ordered.push(schema.clone());
        Ok(schema)
    }

    pub fn get(&self, canonical_name: &str) -> Option<&Arc<ClassSchema>> {
        self.by_name.get(canonical_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ClassSchema>> {
        self.ordered.iter()
    }

    /// Container of all local definitions, in registration order.
    pub fn local_container(&self) -> Result<ClassDefinitionContainer> {
        ClassDefinitionContainer::from_definitions(self.ordered.iter().map(|s| s.definition.clone()))
    }
}

/// Every runtime built-in that can appear as a top-level or raw value.
fn builtin_types() -> Vec<TypeRef> {
    let mut types: Vec<TypeRef> = Primitive::ALL.iter().map(|&p| TypeRef::Primitive(p)).collect();
    types.extend([TypeRef::String, TypeRef::BigInteger, TypeRef::BigDecimal]);
    types.extend(Primitive::ALL.iter().map(|&p| TypeRef::Array(p)));
    types.extend([TypeRef::List(None), TypeRef::Set(None), TypeRef::Map(None)]);
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let table = SchemaTable::with_builtins();
        for name in ["i32", "string", "big_decimal", "f64[]", "list", "set", "map"] {
            assert!(table.get(name).is_some(), "missing builtin {}", name);
        }
        let container = table.local_container().expect("distinct builtin ids");
        assert_eq!(container.len(), 22);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut table = SchemaTable::with_builtins();
        let again = ClassSchema::builtin(TypeRef::String);
        assert!(matches!(
            table.insert(again),
            Err(Error::DuplicateBinding { .. })
        ));
    }
}
