// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Marshaller selection and the resolved-marshaller cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use super::{
    AnyMarshaller, ArrayMarshaller, BigDecimalMarshaller, BigIntegerMarshaller, ClassMarshaller,
    CollectionKind, CollectionMarshaller, ElementCodec, EnumMarshaller, MapMarshaller, Marshaller,
    PrimitiveMarshaller, StringMarshaller, StructuralMarshaller,
};
use crate::error::{Error, Result};
use crate::registry::{
    Capability, ClassDefinitionContainer, ClassSchema, PropertyBinding, PropertyDescriptor,
    PropertyPlan, SchemaKind, SchemaTable,
};
use crate::types::{Primitive, TypeRef};

/// Picks the marshaller of every type and caches the choice.
///
/// Immutable once built apart from the cache, which only ever grows; two
/// threads racing on the same type compute equivalent marshallers and the
/// first insert wins.
pub struct MarshallerStrategy {
    schemas: SchemaTable,
    local: ClassDefinitionContainer,
    overrides: HashMap<TypeRef, Arc<dyn Marshaller>>,
    builtins: HashMap<TypeRef, Arc<dyn Marshaller>>,
    cache: DashMap<TypeRef, Arc<dyn Marshaller>>,
}

impl MarshallerStrategy {
    /// Freeze the schema table and bind every declared property.
    pub(crate) fn new(
        schemas: SchemaTable,
        overrides: Vec<(TypeRef, Arc<dyn Marshaller>)>,
    ) -> Result<Self> {
        let local = schemas.local_container()?;

        let mut by_type = HashMap::new();
        for (type_ref, marshaller) in overrides {
            if !marshaller.accepts(&type_ref) {
                return Err(Error::IncompatibleMarshaller {
                    marshaller: marshaller.name().to_string(),
                    type_name: type_ref.to_string(),
                });
            }
            by_type.insert(type_ref, marshaller);
        }

        let strategy = Self {
            schemas,
            local,
            overrides: by_type,
            builtins: builtin_marshallers(),
            cache: DashMap::new(),
        };
        strategy.bind_all()?;
        Ok(strategy)
    }

    pub fn schema(&self, canonical_name: &str) -> Option<&Arc<ClassSchema>> {
        self.schemas.get(canonical_name)
    }

    pub fn schemas(&self) -> impl Iterator<Item = &Arc<ClassSchema>> {
        self.schemas.iter()
    }

    /// Definitions of every local schema, built-ins included.
    pub fn local_definitions(&self) -> &ClassDefinitionContainer {
        &self.local
    }

    /// Marshaller for `type_ref`.
    pub fn resolve(&self, type_ref: &TypeRef) -> Result<Arc<dyn Marshaller>> {
        if let Some(hit) = self.cache.get(type_ref) {
            return Ok(hit.value().clone());
        }
        // built outside the map so nested resolution never waits on a shard
        let marshaller = self.select(type_ref)?;
        log::trace!("[strategy] {} -> {}", type_ref, marshaller.name());
        Ok(self
            .cache
            .entry(type_ref.clone())
            .or_insert(marshaller)
            .value()
            .clone())
    }

    fn select(&self, type_ref: &TypeRef) -> Result<Arc<dyn Marshaller>> {
        if let TypeRef::Class(name) = type_ref {
            return self.select_class(type_ref, name);
        }
        if let Some(m) = self.overrides.get(type_ref) {
            return Ok(m.clone());
        }
        if let Some(m) = self.builtins.get(type_ref) {
            return Ok(m.clone());
        }
        let marshaller: Arc<dyn Marshaller> = match type_ref {
            TypeRef::Enum(name) => {
                let constants = self
                    .schemas
                    .get(name)
                    .and_then(|s| s.constants())
                    .ok_or_else(|| Error::UnregisteredType(name.to_string()))?;
                Arc::new(EnumMarshaller::new(name.clone(), constants.to_vec()))
            }
            TypeRef::List(element) => Arc::new(CollectionMarshaller::new(
                CollectionKind::List,
                self.codec(element.as_deref())?,
            )),
            TypeRef::Set(element) => Arc::new(CollectionMarshaller::new(
                CollectionKind::Set,
                self.codec(element.as_deref())?,
            )),
            TypeRef::Map(None) => Arc::new(MapMarshaller::new(ElementCodec::Raw, ElementCodec::Raw)),
            TypeRef::Map(Some(kv)) => Arc::new(MapMarshaller::new(
                self.codec(Some(&*kv.0))?,
                self.codec(Some(&*kv.1))?,
            )),
            TypeRef::Any => Arc::new(AnyMarshaller),
            other => return Err(Error::UnregisteredType(other.descriptor())),
        };
        Ok(marshaller)
    }

    fn codec(&self, element: Option<&TypeRef>) -> Result<ElementCodec> {
        match element {
            None | Some(TypeRef::Any) => Ok(ElementCodec::Raw),
            Some(t) => self.resolve(t).map(ElementCodec::Bound),
        }
    }

    fn select_class(&self, type_ref: &TypeRef, name: &str) -> Result<Arc<dyn Marshaller>> {
        let schema = self
            .schemas
            .get(name)
            .ok_or_else(|| Error::UnregisteredType(name.to_string()))?;
        let object = match schema.kind() {
            SchemaKind::Object(object) => object,
            _ => return Err(Error::mismatch("class", name)),
        };
        if let Capability::Streamed(m) | Capability::External(m) = &object.capability {
            return Ok(m.clone());
        }
        if let Some(m) = self.overrides.get(type_ref).or(object.marshaller.as_ref()) {
            return Ok(m.clone());
        }
        Ok(match object.capability {
            Capability::Structural => Arc::new(StructuralMarshaller::new(schema)),
            _ => Arc::new(ClassMarshaller::new(schema)),
        })
    }

    fn bind_all(&self) -> Result<()> {
        for schema in self.schemas.iter() {
            if let Some(m) = schema.class_marshaller() {
                if !m.accepts(&schema.type_ref()) {
                    return Err(Error::IncompatibleMarshaller {
                        marshaller: m.name().to_string(),
                        type_name: schema.canonical_name().to_string(),
                    });
                }
            }
            for property in schema.properties() {
                property.bind(self.bind_property(property)?);
            }
        }
        Ok(())
    }

    fn bind_property(&self, property: &PropertyDescriptor) -> Result<PropertyBinding> {
        let type_ref = property.type_ref();
        let unknown = |type_name: String| Error::UnknownPropertyType {
            canonical_name: property.declaring_type().to_string(),
            property: property.name().to_string(),
            type_name,
        };
        if let Some(missing) = type_ref
            .referenced_names()
            .into_iter()
            .find(|name| self.schemas.get(name).is_none())
        {
            return Err(unknown(missing.to_string()));
        }

        let (marshaller, overridden) = match property.override_marshaller() {
            Some(m) => (m.clone(), true),
            None => {
                let m = self.resolve(type_ref).map_err(|e| match e {
                    Error::UnregisteredType(name) => unknown(name),
                    other => other,
                })?;
                (m, self.overrides.contains_key(type_ref))
            }
        };
        if !marshaller.accepts(type_ref) {
            return Err(Error::IncompatibleMarshaller {
                marshaller: marshaller.name().to_string(),
                type_name: format!(
                    "{}::{} ({})",
                    property.declaring_type(),
                    property.name(),
                    type_ref
                ),
            });
        }

        let plan = match type_ref {
            _ if overridden || property.is_nullable() => PropertyPlan::Delegate,
            TypeRef::Primitive(p) => PropertyPlan::Primitive(*p),
            TypeRef::Array(_) if property.accessor().as_indexed().is_some() => {
                PropertyPlan::PrimitiveArray
            }
            _ => PropertyPlan::Delegate,
        };
        Ok(PropertyBinding { marshaller, plan })
    }
}

fn builtin_marshallers() -> HashMap<TypeRef, Arc<dyn Marshaller>> {
    let mut map: HashMap<TypeRef, Arc<dyn Marshaller>> = HashMap::new();
    for p in Primitive::ALL {
        map.insert(TypeRef::Primitive(p), Arc::new(PrimitiveMarshaller::new(p)));
    }
    map.insert(TypeRef::String, Arc::new(StringMarshaller));
    map.insert(TypeRef::BigInteger, Arc::new(BigIntegerMarshaller));
    map.insert(TypeRef::BigDecimal, Arc::new(BigDecimalMarshaller));
    map.insert(TypeRef::Array(Primitive::Bool), Arc::new(ArrayMarshaller::<bool>::new()));
    map.insert(TypeRef::Array(Primitive::Byte), Arc::new(ArrayMarshaller::<i8>::new()));
    map.insert(TypeRef::Array(Primitive::Char), Arc::new(ArrayMarshaller::<char>::new()));
    map.insert(TypeRef::Array(Primitive::Short), Arc::new(ArrayMarshaller::<i16>::new()));
    map.insert(TypeRef::Array(Primitive::Int), Arc::new(ArrayMarshaller::<i32>::new()));
    map.insert(TypeRef::Array(Primitive::Long), Arc::new(ArrayMarshaller::<i64>::new()));
    map.insert(TypeRef::Array(Primitive::Float), Arc::new(ArrayMarshaller::<f32>::new()));
    map.insert(TypeRef::Array(Primitive::Double), Arc::new(ArrayMarshaller::<f64>::new()));
    map
}

impl fmt::Debug for MarshallerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarshallerStrategy")
            .field("classes", &self.local.len())
            .field("overrides", &self.overrides.len())
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}
