// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lists, sets and maps.
//!
//! ```text
//! list / set : [i32 count] entry*
//! map        : [i32 count] (key entry, value entry)*
//!
//! bound entry: [null flag] payload?               element type declared
//! raw entry  : [null flag] [i64 class id] payload? element type unknown
//! ```
//!
//! Bound entries skip the class id because both sides agree on the element
//! marshaller through the declared type.

use std::sync::Arc;

use super::Marshaller;
use crate::context::SerializationContext;
use crate::error::{Error, Result};
use crate::io::{DataInput, DataOutput, MAX_PREALLOC};
use crate::types::TypeRef;
use crate::value::Value;

/// How a container encodes its entries.
#[derive(Clone)]
pub enum ElementCodec {
    /// Declared element type with its resolved marshaller.
    Bound(Arc<dyn Marshaller>),
    /// Unknown element type: every entry carries its class id.
    Raw,
}

impl ElementCodec {
    fn describe(&self) -> &str {
        match self {
            ElementCodec::Bound(m) => m.name(),
            ElementCodec::Raw => "any",
        }
    }

    fn accepts(&self, element: Option<&TypeRef>) -> bool {
        match (self, element) {
            (ElementCodec::Raw, _) => true,
            (ElementCodec::Bound(m), Some(t)) => m.accepts(t),
            (ElementCodec::Bound(_), None) => false,
        }
    }

    fn write(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        match self {
            ElementCodec::Bound(m) => {
                out.write_null_flag(value.is_null())?;
                if value.is_null() {
                    return Ok(());
                }
                ctx.marshall_nested(m.as_ref(), value, out)
            }
            ElementCodec::Raw => ctx.write_value(value, out),
        }
    }

    fn read(&self, input: &mut DataInput<'_>, ctx: &mut SerializationContext<'_>) -> Result<Value> {
        match self {
            ElementCodec::Bound(m) => {
                if input.read_null_flag()? {
                    return Ok(Value::Null);
                }
                ctx.unmarshall_nested(m.as_ref(), input)
            }
            ElementCodec::Raw => ctx.read_value(input),
        }
    }
}

impl std::fmt::Debug for ElementCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
}

/// Codec for `list<E>` and `set<E>`.
#[derive(Debug, Clone)]
pub struct CollectionMarshaller {
    kind: CollectionKind,
    element: ElementCodec,
    name: String,
}

impl CollectionMarshaller {
    pub fn new(kind: CollectionKind, element: ElementCodec) -> Self {
        let base = match kind {
            CollectionKind::List => "list",
            CollectionKind::Set => "set",
        };
        let name = match &element {
            ElementCodec::Bound(m) => format!("{}<{}>", base, m.name()),
            ElementCodec::Raw => base.to_string(),
        };
        Self {
            kind,
            element,
            name,
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }
}

impl Marshaller for CollectionMarshaller {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        match (self.kind, type_ref) {
            (CollectionKind::List, TypeRef::List(e)) | (CollectionKind::Set, TypeRef::Set(e)) => {
                self.element.accepts(e.as_deref())
            }
            _ => false,
        }
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        let items = match value {
            Value::List(items) | Value::Set(items) => items,
            Value::Null => return Err(Error::null_not_allowed(self.name.clone())),
            other => return Err(Error::mismatch(self.name.clone(), other.kind_name())),
        };
        out.write_len(items.len())?;
        for item in items {
            self.element.write(item, out, ctx)?;
        }
        Ok(())
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        let len = input.read_len()?;
        let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            items.push(self.element.read(input, ctx)?);
        }
        Ok(match self.kind {
            CollectionKind::List => Value::List(items),
            CollectionKind::Set => Value::Set(items),
        })
    }
}

/// Codec for `map<K, V>`.
#[derive(Debug, Clone)]
pub struct MapMarshaller {
    key: ElementCodec,
    value: ElementCodec,
    name: String,
}

impl MapMarshaller {
    pub fn new(key: ElementCodec, value: ElementCodec) -> Self {
        let name = match (&key, &value) {
            (ElementCodec::Raw, ElementCodec::Raw) => "map".to_string(),
            (k, v) => format!("map<{}, {}>", k.describe(), v.describe()),
        };
        Self { key, value, name }
    }
}

impl Marshaller for MapMarshaller {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        match type_ref {
            TypeRef::Map(Some(kv)) => {
                self.key.accepts(Some(&*kv.0)) && self.value.accepts(Some(&*kv.1))
            }
            TypeRef::Map(None) => self.key.accepts(None) && self.value.accepts(None),
            _ => false,
        }
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        let entries = match value {
            Value::Map(entries) => entries,
            Value::Null => return Err(Error::null_not_allowed(self.name.clone())),
            other => return Err(Error::mismatch(self.name.clone(), other.kind_name())),
        };
        out.write_len(entries.len())?;
        for (k, v) in entries {
            self.key.write(k, out, ctx)?;
            self.value.write(v, out, ctx)?;
        }
        Ok(())
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        let len = input.read_len()?;
        let mut entries = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            let k = self.key.read(input, ctx)?;
            let v = self.value.read(input, ctx)?;
            entries.push((k, v));
        }
        Ok(Value::Map(entries))
    }
}
