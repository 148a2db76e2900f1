// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use super::Value;
use crate::error::{Error, Result};

/// A fieldless Rust enum bound as an enum class.
///
/// Constants are identified on the wire by ordinal, so their declaration
/// order must be identical in every process exchanging values.
pub trait MarshalEnum: Sized + Send + Sync + 'static {
    fn canonical_name() -> &'static str;
    /// Constant names in declaration order.
    fn constants() -> &'static [&'static str];
    fn ordinal(&self) -> u32;
    fn from_ordinal(ordinal: u32) -> Option<Self>;
}

/// Enum constant as a runtime value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub canonical_name: Arc<str>,
    pub ordinal: u32,
}

impl EnumValue {
    pub fn new(canonical_name: impl Into<Arc<str>>, ordinal: u32) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            ordinal,
        }
    }
}

pub fn enum_to_value<E: MarshalEnum>(value: &E) -> Value {
    Value::Enum(EnumValue::new(E::canonical_name(), value.ordinal()))
}

pub fn enum_from_value<E: MarshalEnum>(value: Value) -> Result<E> {
    match value {
        Value::Enum(e) if &*e.canonical_name == E::canonical_name() => E::from_ordinal(e.ordinal)
            .ok_or_else(|| Error::UnmatchedEnumOrdinal {
                canonical_name: E::canonical_name().to_string(),
                ordinal: e.ordinal as i32,
            }),
        Value::Null => Err(Error::null_not_allowed(E::canonical_name())),
        other => Err(Error::mismatch(E::canonical_name(), other.kind_name())),
    }
}
