// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::Marshaller;
use crate::context::SerializationContext;
use crate::error::{Error, Result};
use crate::io::{DataInput, DataOutput};
use crate::types::TypeRef;
use crate::value::Value;

/// Chunked modified-UTF-8 strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringMarshaller;

impl Marshaller for StringMarshaller {
    fn name(&self) -> &str {
        "string"
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        *type_ref == TypeRef::String
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        match value {
            Value::String(s) => out.write_utf(s),
            Value::Null => Err(Error::null_not_allowed("string")),
            other => Err(Error::mismatch("string", other.kind_name())),
        }
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        input.read_utf().map(Value::String)
    }
}
