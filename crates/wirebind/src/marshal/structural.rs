// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::{Arc, Weak};

use super::class::{read_object, read_properties, write_object, write_properties};
use super::Marshaller;
use crate::context::SerializationContext;
use crate::error::{Error, Result};
use crate::io::{DataInput, DataOutput};
use crate::registry::ClassSchema;
use crate::types::TypeRef;
use crate::value::Value;

/// Fallback for schema-only classes: same wire shape as a compiled class,
/// every property read and written as a [`Value`].
pub struct StructuralMarshaller {
    schema: Weak<ClassSchema>,
    canonical_name: Arc<str>,
}

impl StructuralMarshaller {
    pub fn new(schema: &Arc<ClassSchema>) -> Self {
        Self {
            schema: Arc::downgrade(schema),
            canonical_name: Arc::from(schema.canonical_name()),
        }
    }

    fn schema(&self) -> Result<Arc<ClassSchema>> {
        self.schema
            .upgrade()
            .ok_or_else(|| Error::UnregisteredType(self.canonical_name.to_string()))
    }
}

impl Marshaller for StructuralMarshaller {
    fn name(&self) -> &str {
        &self.canonical_name
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        matches!(type_ref, TypeRef::Class(name) if *name == self.canonical_name)
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        let schema = self.schema()?;
        write_object(&self.canonical_name, value, out, ctx, |obj, out, ctx| {
            write_properties(&schema, obj, out, ctx, false)
        })
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        let schema = self.schema()?;
        read_object(&schema, input, ctx, |obj, input, ctx| {
            read_properties(&schema, obj, input, ctx, false)
        })
    }
}
