// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridge between Rust field types and [`Value`].
//!
//! Every property type implements [`PropertyValue`]: it reports its declared
//! [`TypeRef`], converts to and from [`Value`], and (for the eight primitive
//! kinds) exposes unboxed fast paths that accessors use to skip the
//! `Value` round-trip entirely.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use super::{BigDecimal, BigInteger, Marshallable, ObjectRef, Shared, Value};
use crate::error::{Error, Result};
use crate::types::{Primitive, TypeRef};

/// Generate default primitive fast-path methods (`None` = not this primitive).
macro_rules! primitive_fast_paths {
    ($(($as_fn:ident, $from_fn:ident, $ty:ty)),* $(,)?) => {
        $(
            #[doc(hidden)]
            fn $as_fn(&self) -> Option<$ty> {
                None
            }

            #[doc(hidden)]
            fn $from_fn(_value: $ty) -> Option<Self> {
                None
            }
        )*
    };
}

/// A Rust type usable as a property, container element or top-level value.
pub trait PropertyValue: Sized + Send + Sync + 'static {
    /// Declared type of a property holding `Self`.
    fn type_ref() -> TypeRef;

    /// Whether `Self` admits null (writes a null flag on the wire).
    fn nullable() -> bool {
        false
    }

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;

    primitive_fast_paths!(
        (as_bool, from_bool, bool),
        (as_byte, from_byte, i8),
        (as_char, from_char, char),
        (as_short, from_short, i16),
        (as_int, from_int, i32),
        (as_long, from_long, i64),
        (as_float, from_float, f32),
        (as_double, from_double, f64),
    );

    /// Declared type of `Vec<Self>`; primitives override to a primitive array.
    #[doc(hidden)]
    fn list_type_ref() -> TypeRef {
        TypeRef::list(Self::type_ref())
    }

    #[doc(hidden)]
    fn list_to_value(items: &[Self]) -> Value {
        Value::List(items.iter().map(PropertyValue::to_value).collect())
    }

    #[doc(hidden)]
    fn list_from_value(value: Value) -> Result<Vec<Self>> {
        match value {
            Value::List(items) | Value::Set(items) => {
                items.into_iter().map(Self::from_value).collect()
            }
            Value::Null => Err(Error::null_not_allowed("list")),
            other => Err(Error::mismatch("list", other.kind_name())),
        }
    }
}

macro_rules! impl_primitive_value {
    ($ty:ty, $prim:ident, $variant:ident, $array:ident, $as_fn:ident, $from_fn:ident) => {
        impl PropertyValue for $ty {
            fn type_ref() -> TypeRef {
                TypeRef::Primitive(Primitive::$prim)
            }

            fn to_value(&self) -> Value {
                Value::$variant(*self)
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    Value::Null => Err(Error::null_not_allowed(Primitive::$prim.name())),
                    other => Err(Error::mismatch(Primitive::$prim.name(), other.kind_name())),
                }
            }

            fn $as_fn(&self) -> Option<$ty> {
                Some(*self)
            }

            fn $from_fn(value: $ty) -> Option<Self> {
                Some(value)
            }

            fn list_type_ref() -> TypeRef {
                TypeRef::Array(Primitive::$prim)
            }

            fn list_to_value(items: &[Self]) -> Value {
                Value::$array(items.to_vec())
            }

            fn list_from_value(value: Value) -> Result<Vec<Self>> {
                match value {
                    Value::$array(items) => Ok(items),
                    Value::List(items) => items.into_iter().map(Self::from_value).collect(),
                    Value::Null => Err(Error::null_not_allowed(Primitive::$prim.array_name())),
                    other => Err(Error::mismatch(Primitive::$prim.array_name(), other.kind_name())),
                }
            }
        }
    };
}

impl_primitive_value!(bool, Bool, Bool, BoolArray, as_bool, from_bool);
impl_primitive_value!(i8, Byte, Byte, ByteArray, as_byte, from_byte);
impl_primitive_value!(char, Char, Char, CharArray, as_char, from_char);
impl_primitive_value!(i16, Short, Short, ShortArray, as_short, from_short);
impl_primitive_value!(i32, Int, Int, IntArray, as_int, from_int);
impl_primitive_value!(i64, Long, Long, LongArray, as_long, from_long);
impl_primitive_value!(f32, Float, Float, FloatArray, as_float, from_float);
impl_primitive_value!(f64, Double, Double, DoubleArray, as_double, from_double);

macro_rules! impl_scalar_value {
    ($ty:ty, $type_ref:expr, $variant:ident, $name:expr) => {
        impl PropertyValue for $ty {
            fn type_ref() -> TypeRef {
                $type_ref
            }

            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    Value::Null => Err(Error::null_not_allowed($name)),
                    other => Err(Error::mismatch($name, other.kind_name())),
                }
            }
        }
    };
}

impl_scalar_value!(String, TypeRef::String, String, "string");
impl_scalar_value!(BigInteger, TypeRef::BigInteger, BigInteger, "big_integer");
impl_scalar_value!(BigDecimal, TypeRef::BigDecimal, BigDecimal, "big_decimal");

impl<V: PropertyValue> PropertyValue for Option<V> {
    fn type_ref() -> TypeRef {
        V::type_ref()
    }

    fn nullable() -> bool {
        true
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, PropertyValue::to_value)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => V::from_value(other).map(Some),
        }
    }
}

impl<V: PropertyValue> PropertyValue for Vec<V> {
    fn type_ref() -> TypeRef {
        V::list_type_ref()
    }

    fn to_value(&self) -> Value {
        V::list_to_value(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        V::list_from_value(value)
    }
}

fn set_items(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Set(items) | Value::List(items) => Ok(items),
        Value::Null => Err(Error::null_not_allowed("set")),
        other => Err(Error::mismatch("set", other.kind_name())),
    }
}

fn map_entries(value: Value) -> Result<Vec<(Value, Value)>> {
    match value {
        Value::Map(entries) => Ok(entries),
        Value::Null => Err(Error::null_not_allowed("map")),
        other => Err(Error::mismatch("map", other.kind_name())),
    }
}

impl<V: PropertyValue + Eq + Hash> PropertyValue for HashSet<V> {
    fn type_ref() -> TypeRef {
        TypeRef::set(V::type_ref())
    }

    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(PropertyValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        set_items(value)?.into_iter().map(V::from_value).collect()
    }
}

impl<V: PropertyValue + Ord> PropertyValue for BTreeSet<V> {
    fn type_ref() -> TypeRef {
        TypeRef::set(V::type_ref())
    }

    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(PropertyValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        set_items(value)?.into_iter().map(V::from_value).collect()
    }
}

impl<K: PropertyValue + Eq + Hash, V: PropertyValue> PropertyValue for HashMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::map(K::type_ref(), V::type_ref())
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self> {
        map_entries(value)?
            .into_iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect()
    }
}

impl<K: PropertyValue + Ord, V: PropertyValue> PropertyValue for BTreeMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::map(K::type_ref(), V::type_ref())
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self> {
        map_entries(value)?
            .into_iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect()
    }
}

/// Raw slot: any value, written with its class id.
impl PropertyValue for Value {
    fn type_ref() -> TypeRef {
        TypeRef::Any
    }

    fn nullable() -> bool {
        true
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

/// Shared instances keep their identity through a size-optimized round-trip.
impl<T: Marshallable> PropertyValue for Shared<T> {
    fn type_ref() -> TypeRef {
        TypeRef::class(T::canonical_name())
    }

    fn to_value(&self) -> Value {
        Value::Object(ObjectRef::from_shared(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(obj) => obj
                .downcast::<T>()
                .ok_or_else(|| Error::mismatch(T::canonical_name(), obj.canonical_name())),
            Value::Null => Err(Error::null_not_allowed(T::canonical_name())),
            other => Err(Error::mismatch(T::canonical_name(), other.kind_name())),
        }
    }
}
