// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compiled accessors: direct field projection through function pointers.

use std::fmt;

use super::{wrong_target, IndexedPropertyAccessor, PropertyAccessor};
use crate::error::{Error, Result};
use crate::io::{DataInput, DataOutput, MAX_PREALLOC};
use crate::marshal::ArrayElement;
use crate::types::Primitive;
use crate::value::{Marshallable, ObjectRef, PropertyValue, Value};

/// Attach the property path to a null violation raised while converting.
fn in_property(err: Error, declaring_type: &str, name: &str) -> Error {
    match err {
        Error::NullNotAllowed { .. } => Error::NullNotAllowed {
            context: format!("{}::{}", declaring_type, name),
        },
        other => other,
    }
}

/// Generate typed fast paths that bypass `Value` when `V` is that primitive.
macro_rules! field_fast_paths {
    ($(($read_fn:ident, $write_fn:ident, $as_fn:ident, $from_fn:ident, $ty:ty)),* $(,)?) => {
        $(
            fn $read_fn(&self, target: &ObjectRef) -> Result<$ty> {
                match target.read(|t: &T| (self.get)(t).$as_fn()) {
                    Some(Some(v)) => Ok(v),
                    Some(None) => <$ty as PropertyValue>::from_value(self.read(target)?),
                    None => Err(wrong_target(self.declaring_type, target)),
                }
            }

            fn $write_fn(&self, target: &ObjectRef, value: $ty) -> Result<()> {
                match V::$from_fn(value) {
                    Some(v) => self.store(target, v),
                    None => self.write(target, PropertyValue::to_value(&value)),
                }
            }
        )*
    };
}

/// Accessor for field `V` of `T`.
pub struct FieldAccessor<T, V> {
    declaring_type: &'static str,
    name: &'static str,
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
}

impl<T: Marshallable, V: PropertyValue> FieldAccessor<T, V> {
    pub fn new(name: &'static str, get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self {
        Self {
            declaring_type: T::canonical_name(),
            name,
            get,
            get_mut,
        }
    }

    fn store(&self, target: &ObjectRef, value: V) -> Result<()> {
        target
            .write(|t: &mut T| *(self.get_mut)(t) = value)
            .ok_or_else(|| wrong_target(self.declaring_type, target))
    }
}

impl<T: Marshallable, V: PropertyValue> PropertyAccessor for FieldAccessor<T, V> {
    fn declaring_type(&self) -> &str {
        self.declaring_type
    }

    fn property_name(&self) -> &str {
        self.name
    }

    fn read(&self, target: &ObjectRef) -> Result<Value> {
        target
            .read(|t: &T| (self.get)(t).to_value())
            .ok_or_else(|| wrong_target(self.declaring_type, target))
    }

    fn write(&self, target: &ObjectRef, value: Value) -> Result<()> {
        let value =
            V::from_value(value).map_err(|e| in_property(e, self.declaring_type, self.name))?;
        self.store(target, value)
    }

    field_fast_paths!(
        (read_bool, write_bool, as_bool, from_bool, bool),
        (read_byte, write_byte, as_byte, from_byte, i8),
        (read_char, write_char, as_char, from_char, char),
        (read_short, write_short, as_short, from_short, i16),
        (read_int, write_int, as_int, from_int, i32),
        (read_long, write_long, as_long, from_long, i64),
        (read_float, write_float, as_float, from_float, f32),
        (read_double, write_double, as_double, from_double, f64),
    );
}

impl<T, V> fmt::Debug for FieldAccessor<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldAccessor({}::{})", self.declaring_type, self.name)
    }
}

/// Accessor for a `Vec<E>` field encoded as a primitive array.
pub struct IndexedFieldAccessor<T, E> {
    declaring_type: &'static str,
    name: &'static str,
    get: fn(&T) -> &Vec<E>,
    get_mut: fn(&mut T) -> &mut Vec<E>,
}

impl<T: Marshallable, E: ArrayElement> IndexedFieldAccessor<T, E> {
    pub fn new(
        name: &'static str,
        get: fn(&T) -> &Vec<E>,
        get_mut: fn(&mut T) -> &mut Vec<E>,
    ) -> Self {
        Self {
            declaring_type: T::canonical_name(),
            name,
            get,
            get_mut,
        }
    }

    fn with_vec<R>(&self, target: &ObjectRef, f: impl FnOnce(&Vec<E>) -> R) -> Result<R> {
        target
            .read(|t: &T| f((self.get)(t)))
            .ok_or_else(|| wrong_target(self.declaring_type, target))
    }

    fn with_vec_mut<R>(&self, target: &ObjectRef, f: impl FnOnce(&mut Vec<E>) -> R) -> Result<R> {
        target
            .write(|t: &mut T| f((self.get_mut)(t)))
            .ok_or_else(|| wrong_target(self.declaring_type, target))
    }

    fn out_of_bounds(&self, index: usize, len: usize) -> Error {
        Error::mismatch(
            format!("index below {} for {}::{}", len, self.declaring_type, self.name),
            index.to_string(),
        )
    }
}

impl<T: Marshallable, E: ArrayElement> PropertyAccessor for IndexedFieldAccessor<T, E> {
    fn declaring_type(&self) -> &str {
        self.declaring_type
    }

    fn property_name(&self) -> &str {
        self.name
    }

    fn read(&self, target: &ObjectRef) -> Result<Value> {
        self.with_vec(target, |v| E::wrap(v.clone()))
    }

    fn write(&self, target: &ObjectRef, value: Value) -> Result<()> {
        let items = <Vec<E>>::from_value(value)
            .map_err(|e| in_property(e, self.declaring_type, self.name))?;
        self.with_vec_mut(target, |v| *v = items)
    }

    fn as_indexed(&self) -> Option<&dyn IndexedPropertyAccessor> {
        Some(self)
    }
}

impl<T: Marshallable, E: ArrayElement> IndexedPropertyAccessor for IndexedFieldAccessor<T, E> {
    fn element_type(&self) -> Primitive {
        E::PRIMITIVE
    }

    fn len(&self, target: &ObjectRef) -> Result<usize> {
        self.with_vec(target, Vec::len)
    }

    fn read_at(&self, target: &ObjectRef, index: usize) -> Result<Value> {
        match self.with_vec(target, |v| v.get(index).map(PropertyValue::to_value).ok_or(v.len()))? {
            Ok(value) => Ok(value),
            Err(len) => Err(self.out_of_bounds(index, len)),
        }
    }

    fn write_at(&self, target: &ObjectRef, index: usize, value: Value) -> Result<()> {
        let element = E::from_value(value)?;
        let stored = self.with_vec_mut(target, |v| match v.get_mut(index) {
            Some(slot) => {
                *slot = element;
                Ok(())
            }
            None => Err(v.len()),
        })?;
        stored.map_err(|len| self.out_of_bounds(index, len))
    }

    fn resize(&self, target: &ObjectRef, len: usize) -> Result<()> {
        self.with_vec_mut(target, |v| v.resize(len, E::default()))
    }

    fn write_elements(&self, target: &ObjectRef, out: &mut DataOutput<'_>) -> Result<()> {
        self.with_vec(target, |v| {
            out.write_len(v.len())?;
            v.iter().try_for_each(|&e| e.write_element(out))
        })?
    }

    fn read_elements(&self, target: &ObjectRef, input: &mut DataInput<'_>) -> Result<()> {
        let len = input.read_len()?;
        let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            items.push(E::read_element(input)?);
        }
        self.with_vec_mut(target, |v| *v = items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassBuilder;

    #[derive(Debug, Default, Clone)]
    struct Sample {
        id: i32,
        name: Option<String>,
        samples: Vec<i64>,
    }

    impl Marshallable for Sample {
        fn canonical_name() -> &'static str {
            "test::Sample"
        }

        fn describe(class: &mut ClassBuilder<Self>) {
            class
                .property("id", |s| &s.id, |s| &mut s.id)
                .property("name", |s| &s.name, |s| &mut s.name)
                .array_property("samples", |s| &s.samples, |s| &mut s.samples);
        }
    }

    fn id_accessor() -> FieldAccessor<Sample, i32> {
        FieldAccessor::new("id", |s| &s.id, |s| &mut s.id)
    }

    #[test]
    fn test_fast_path_read_write() {
        let obj = ObjectRef::new(Sample::default());
        let acc = id_accessor();
        acc.write_int(&obj, 10000).expect("write int");
        assert_eq!(acc.read_int(&obj).expect("read int"), 10000);
        assert_eq!(acc.read(&obj).expect("read value"), Value::Int(10000));
    }

    #[test]
    fn test_typed_path_falls_back_on_other_kind() {
        let obj = ObjectRef::new(Sample::default());
        let acc = id_accessor();
        // a long is not an int: the generic path reports the mismatch
        assert!(matches!(acc.read_long(&obj), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_null_write_names_property() {
        let obj = ObjectRef::new(Sample::default());
        match id_accessor().write(&obj, Value::Null) {
            Err(Error::NullNotAllowed { context }) => assert_eq!(context, "test::Sample::id"),
            other => panic!("expected NullNotAllowed, got {:?}", other),
        }
        let name: FieldAccessor<Sample, Option<String>> =
            FieldAccessor::new("name", |s| &s.name, |s| &mut s.name);
        name.write(&obj, Value::Null).expect("nullable");
    }

    #[test]
    fn test_wrong_target() {
        let other = crate::value::DynamicObject::new("x").into_object();
        assert!(matches!(
            id_accessor().read(&other),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_indexed_elements() {
        let obj = ObjectRef::new(Sample {
            samples: vec![1, 2, 3],
            ..Sample::default()
        });
        let acc: IndexedFieldAccessor<Sample, i64> =
            IndexedFieldAccessor::new("samples", |s| &s.samples, |s| &mut s.samples);
        assert_eq!(acc.len(&obj).expect("len"), 3);
        acc.write_at(&obj, 1, Value::Long(20)).expect("write at");
        assert_eq!(acc.read_at(&obj, 1).expect("read at"), Value::Long(20));
        assert!(acc.read_at(&obj, 9).is_err());

        let mut buf = Vec::new();
        acc.write_elements(&obj, &mut DataOutput::new(&mut buf))
            .expect("write elements");
        assert_eq!(buf.len(), 4 + 3 * 8);

        let copy = ObjectRef::new(Sample::default());
        let mut slice = buf.as_slice();
        acc.read_elements(&copy, &mut DataInput::new(&mut slice))
            .expect("read elements");
        assert_eq!(acc.read(&copy).expect("read"), Value::LongArray(vec![1, 20, 3]));

        acc.resize(&copy, 5).expect("resize");
        assert_eq!(acc.len(&copy).expect("len"), 5);
    }
}
