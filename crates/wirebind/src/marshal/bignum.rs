// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Big numbers: `[i32 len][two's-complement bytes]`, decimals prefixed by `[i32 scale]`.

use super::Marshaller;
use crate::context::SerializationContext;
use crate::error::{Error, Result};
use crate::io::{DataInput, DataOutput};
use crate::types::TypeRef;
use crate::value::{BigDecimal, BigInteger, Value};

fn write_integer(value: &BigInteger, out: &mut DataOutput<'_>) -> Result<()> {
    let bytes = value.to_be_bytes();
    out.write_len(bytes.len())?;
    out.write_bytes(bytes)
}

fn read_integer(input: &mut DataInput<'_>) -> Result<BigInteger> {
    let offset = input.offset();
    let len = input.read_len()?;
    if len == 0 {
        return Err(Error::InvalidData {
            offset,
            reason: "empty big integer".into(),
        });
    }
    Ok(BigInteger::from_be_bytes(&input.read_bytes(len)?))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntegerMarshaller;

impl Marshaller for BigIntegerMarshaller {
    fn name(&self) -> &str {
        "big_integer"
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        *type_ref == TypeRef::BigInteger
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        match value {
            Value::BigInteger(v) => write_integer(v, out),
            Value::Null => Err(Error::null_not_allowed("big_integer")),
            other => Err(Error::mismatch("big_integer", other.kind_name())),
        }
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        read_integer(input).map(Value::BigInteger)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BigDecimalMarshaller;

impl Marshaller for BigDecimalMarshaller {
    fn name(&self) -> &str {
        "big_decimal"
    }

    fn accepts(&self, type_ref: &TypeRef) -> bool {
        *type_ref == TypeRef::BigDecimal
    }

    fn marshall(
        &self,
        value: &Value,
        out: &mut DataOutput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        match value {
            Value::BigDecimal(v) => {
                out.write_i32(v.scale())?;
                write_integer(v.unscaled(), out)
            }
            Value::Null => Err(Error::null_not_allowed("big_decimal")),
            other => Err(Error::mismatch("big_decimal", other.kind_name())),
        }
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        let scale = input.read_i32()?;
        let unscaled = read_integer(input)?;
        Ok(Value::BigDecimal(BigDecimal::new(unscaled, scale)))
    }
}
