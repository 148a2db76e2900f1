// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use super::Marshaller;
use crate::context::SerializationContext;
use crate::error::{Error, Result};
use crate::io::{DataInput, DataOutput};
use crate::types::TypeRef;
use crate::value::{EnumValue, Value};

/// Enum constants: `[i64 owning class id][i32 ordinal]`.
///
/// The owning id is written even when the declared type already names the
/// enum, so a reader can confirm it decodes the expected class.
#[derive(Debug, Clone)]
pub struct EnumMarshaller {
    canonical_name: Arc<str>,
    constants: Vec<Arc<str>>,
}

impl EnumMarshaller {
    pub fn new(canonical_name: Arc<str>, constants: Vec<Arc<str>>) -> Self {
        Self {
            canonical_name,
            constants,
        }
    }

    pub fn constants(&self) -> &[Arc<str>] {
        &self.constants
    }

    fn unmatched(&self, ordinal: i32) -> Error {
        Error::UnmatchedEnumOrdinal {
            canonical_name: self.canonical_name.to_string(),
            ordinal,
        }
    }
}

impl Marshaller for EnumMarshaller {
    fn name(&self) -> &str {
        &self.canonical_name
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        matches!(type_ref, TypeRef::Enum(name) if *name == self.canonical_name)
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        let constant = match value {
            Value::Enum(e) if e.canonical_name == self.canonical_name => e,
            Value::Null => return Err(Error::null_not_allowed(self.canonical_name.to_string())),
            other => return Err(Error::mismatch(self.canonical_name.to_string(), other.kind_name())),
        };
        let ordinal = i32::try_from(constant.ordinal).unwrap_or(i32::MAX);
        if constant.ordinal as usize >= self.constants.len() {
            return Err(self.unmatched(ordinal));
        }
        out.write_i64(ctx.class_id(&self.canonical_name)?)?;
        out.write_i32(ordinal)
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        let id = input.read_i64()?;
        let schema = ctx.schema_by_id(id)?;
        if schema.canonical_name() != &*self.canonical_name {
            return Err(Error::mismatch(
                self.canonical_name.to_string(),
                schema.canonical_name(),
            ));
        }
        let ordinal = input.read_i32()?;
        match u32::try_from(ordinal) {
            Ok(o) if (o as usize) < self.constants.len() => {
                Ok(Value::Enum(EnumValue::new(self.canonical_name.clone(), o)))
            }
            _ => Err(self.unmatched(ordinal)),
        }
    }
}
