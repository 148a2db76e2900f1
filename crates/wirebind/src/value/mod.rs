// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Runtime values
//!
//! [`Value`] is the dynamic representation every marshaller reads and
//! writes. Rust types cross into it through [`PropertyValue`]; object
//! instances are carried as [`ObjectRef`] handles so identity survives
//! the trip.
//!
//! ```text
//! typed field --PropertyValue--> Value --Marshaller--> bytes
//! ```

mod bignum;
mod dynamic;
mod enums;
mod object;
mod property;

pub use bignum::{BigDecimal, BigInteger};
pub use dynamic::DynamicObject;
pub use enums::{enum_from_value, enum_to_value, EnumValue, MarshalEnum};
pub use object::{object_from_value, object_to_value, shared, Marshallable, ObjectRef, Shared};
pub use property::PropertyValue;

use crate::types::{Primitive, TypeRef};

/// Dynamically typed value.
///
/// Equality is structural except for [`Value::Object`], which compares by
/// instance identity. Sets keep insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    BigInteger(BigInteger),
    BigDecimal(BigDecimal),
    BoolArray(Vec<bool>),
    ByteArray(Vec<i8>),
    CharArray(Vec<char>),
    ShortArray(Vec<i16>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    Enum(EnumValue),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Object(ObjectRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type used to pick a class definition and marshaller for this value.
    ///
    /// Containers report their raw form; `None` for [`Value::Null`].
    pub fn runtime_type(&self) -> Option<TypeRef> {
        let ty = match self {
            Value::Null => return None,
            Value::Bool(_) => TypeRef::Primitive(Primitive::Bool),
            Value::Byte(_) => TypeRef::Primitive(Primitive::Byte),
            Value::Char(_) => TypeRef::Primitive(Primitive::Char),
            Value::Short(_) => TypeRef::Primitive(Primitive::Short),
            Value::Int(_) => TypeRef::Primitive(Primitive::Int),
            Value::Long(_) => TypeRef::Primitive(Primitive::Long),
            Value::Float(_) => TypeRef::Primitive(Primitive::Float),
            Value::Double(_) => TypeRef::Primitive(Primitive::Double),
            Value::String(_) => TypeRef::String,
            Value::BigInteger(_) => TypeRef::BigInteger,
            Value::BigDecimal(_) => TypeRef::BigDecimal,
            Value::BoolArray(_) => TypeRef::Array(Primitive::Bool),
            Value::ByteArray(_) => TypeRef::Array(Primitive::Byte),
            Value::CharArray(_) => TypeRef::Array(Primitive::Char),
            Value::ShortArray(_) => TypeRef::Array(Primitive::Short),
            Value::IntArray(_) => TypeRef::Array(Primitive::Int),
            Value::LongArray(_) => TypeRef::Array(Primitive::Long),
            Value::FloatArray(_) => TypeRef::Array(Primitive::Float),
            Value::DoubleArray(_) => TypeRef::Array(Primitive::Double),
            Value::Enum(e) => TypeRef::Enum(e.canonical_name.clone()),
            Value::List(_) => TypeRef::List(None),
            Value::Set(_) => TypeRef::Set(None),
            Value::Map(_) => TypeRef::Map(None),
            Value::Object(o) => TypeRef::Class(o.canonical_name_arc()),
        };
        Some(ty)
    }

    /// Short human-readable kind, used in error messages.
    pub fn kind_name(&self) -> String {
        match self.runtime_type() {
            Some(ty) => ty.canonical_name().into_owned(),
            None => "null".to_string(),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    i8 => Byte,
    char => Char,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    BigInteger => BigInteger,
    BigDecimal => BigDecimal,
    EnumValue => Enum,
    ObjectRef => Object,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
