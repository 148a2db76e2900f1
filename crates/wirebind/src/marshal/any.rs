// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::Marshaller;
use crate::context::SerializationContext;
use crate::error::Result;
use crate::io::{DataInput, DataOutput};
use crate::types::TypeRef;
use crate::value::Value;

/// Slots declared as `any`: `[class id][payload]` picked from the runtime type.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyMarshaller;

impl Marshaller for AnyMarshaller {
    fn name(&self) -> &str {
        "any"
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        *type_ref == TypeRef::Any
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        ctx.write_typed(value, out)
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        ctx.read_typed(input)
    }
}
