// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Property accessors
//!
//! Uniform read/write access to one declared property of an instance,
//! whatever the access tier behind it.
//!
//! | Tier | Type | Used for |
//! |------|------|----------|
//! | compiled | [`FieldAccessor`] | fields of `Marshallable` types |
//! | compiled, indexed | [`IndexedFieldAccessor`] | `Vec<primitive>` fields |
//! | fallback | [`DynamicAccessor`] | properties of [`DynamicObject`](crate::DynamicObject) |
//!
//! The typed `read_*` / `write_*` methods are unboxed fast paths; their
//! default implementations go through the generic [`Value`] path, so an
//! accessor only overrides what it can do faster.

mod dynamic;
mod field;

pub use dynamic::DynamicAccessor;
pub use field::{FieldAccessor, IndexedFieldAccessor};

use crate::error::Result;
use crate::io::{DataInput, DataOutput};
use crate::types::Primitive;
use crate::value::{ObjectRef, PropertyValue, Value};

/// Generate typed fast-path defaults routed through the generic path.
macro_rules! typed_defaults {
    ($(($read_fn:ident, $write_fn:ident, $ty:ty)),* $(,)?) => {
        $(
            fn $read_fn(&self, target: &ObjectRef) -> Result<$ty> {
                <$ty as PropertyValue>::from_value(self.read(target)?)
            }

            fn $write_fn(&self, target: &ObjectRef, value: $ty) -> Result<()> {
                self.write(target, PropertyValue::to_value(&value))
            }
        )*
    };
}

/// Read/write access to one property of a class.
pub trait PropertyAccessor: Send + Sync {
    /// Canonical name of the class declaring the property.
    fn declaring_type(&self) -> &str;

    fn property_name(&self) -> &str;

    /// Read the property as a [`Value`].
    fn read(&self, target: &ObjectRef) -> Result<Value>;

    /// Replace the property with `value`.
    fn write(&self, target: &ObjectRef, value: Value) -> Result<()>;

    typed_defaults!(
        (read_bool, write_bool, bool),
        (read_byte, write_byte, i8),
        (read_char, write_char, char),
        (read_short, write_short, i16),
        (read_int, write_int, i32),
        (read_long, write_long, i64),
        (read_float, write_float, f32),
        (read_double, write_double, f64),
    );

    /// Indexed view, for accessors over primitive arrays.
    fn as_indexed(&self) -> Option<&dyn IndexedPropertyAccessor> {
        None
    }
}

/// Accessor over a primitive-array property.
pub trait IndexedPropertyAccessor: PropertyAccessor {
    fn element_type(&self) -> Primitive;

    fn len(&self, target: &ObjectRef) -> Result<usize>;

    fn is_empty(&self, target: &ObjectRef) -> Result<bool> {
        Ok(self.len(target)? == 0)
    }

    fn read_at(&self, target: &ObjectRef, index: usize) -> Result<Value>;

    fn write_at(&self, target: &ObjectRef, index: usize, value: Value) -> Result<()>;

    /// Resize, filling new slots with the element default.
    fn resize(&self, target: &ObjectRef, len: usize) -> Result<()>;

    /// Stream `[count][elements]` straight from the field under one lock.
    fn write_elements(&self, target: &ObjectRef, out: &mut DataOutput<'_>) -> Result<()>;

    /// Read `[count][elements]` and replace the field.
    fn read_elements(&self, target: &ObjectRef, input: &mut DataInput<'_>) -> Result<()>;
}

/// Error for a target that is not an instance of the declaring type.
pub(crate) fn wrong_target(declaring_type: &str, target: &ObjectRef) -> crate::Error {
    crate::Error::TypeMismatch {
        expected: declaring_type.to_string(),
        found: target.canonical_name().to_string(),
    }
}
