// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Static type references.
//!
//! A [`TypeRef`] names the declared type of a property, a container element
//! or a runtime value. It drives marshaller resolution, checksum signatures
//! and the mapping from runtime values to class definitions.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Fixed-width primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Bool,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Primitive::Bool,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
    ];

    /// Canonical name of the boxed primitive class.
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Byte => "i8",
            Primitive::Char => "char",
            Primitive::Short => "i16",
            Primitive::Int => "i32",
            Primitive::Long => "i64",
            Primitive::Float => "f32",
            Primitive::Double => "f64",
        }
    }

    /// Canonical name of the primitive array class.
    pub const fn array_name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool[]",
            Primitive::Byte => "i8[]",
            Primitive::Char => "char[]",
            Primitive::Short => "i16[]",
            Primitive::Int => "i32[]",
            Primitive::Long => "i64[]",
            Primitive::Float => "f32[]",
            Primitive::Double => "f64[]",
        }
    }

    /// Encoded width in bytes.
    pub const fn width(self) -> usize {
        match self {
            Primitive::Bool | Primitive::Byte => 1,
            Primitive::Short => 2,
            Primitive::Char | Primitive::Int | Primitive::Float => 4,
            Primitive::Long | Primitive::Double => 8,
        }
    }
}

/// Declared or runtime type.
///
/// Container variants carry `None` when unbound ("raw"); raw containers
/// prefix every entry with its class id. Use [`TypeRef::list`],
/// [`TypeRef::set`] and [`TypeRef::map`] to build containers: they normalize
/// an [`TypeRef::Any`] element to the raw form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    String,
    BigInteger,
    BigDecimal,
    Array(Primitive),
    Enum(Arc<str>),
    List(Option<Box<TypeRef>>),
    Set(Option<Box<TypeRef>>),
    Map(Option<(Box<TypeRef>, Box<TypeRef>)>),
    Class(Arc<str>),
    /// Any value; encoded with its class id.
    Any,
}

impl TypeRef {
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        TypeRef::Class(name.into())
    }

    pub fn enumeration(name: impl Into<Arc<str>>) -> Self {
        TypeRef::Enum(name.into())
    }

    pub fn list(element: TypeRef) -> Self {
        TypeRef::List(bind(element))
    }

    pub fn set(element: TypeRef) -> Self {
        TypeRef::Set(bind(element))
    }

    /// A map is bound only when both key and value types are known.
    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        match (key, value) {
            (TypeRef::Any, _) | (_, TypeRef::Any) => TypeRef::Map(None),
            (k, v) => TypeRef::Map(Some((Box::new(k), Box::new(v)))),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// Name of the class definition that describes values of this type.
    pub fn canonical_name(&self) -> Cow<'_, str> {
        match self {
            TypeRef::Primitive(p) => Cow::Borrowed(p.name()),
            TypeRef::String => Cow::Borrowed("string"),
            TypeRef::BigInteger => Cow::Borrowed("big_integer"),
            TypeRef::BigDecimal => Cow::Borrowed("big_decimal"),
            TypeRef::Array(p) => Cow::Borrowed(p.array_name()),
            TypeRef::Enum(name) | TypeRef::Class(name) => Cow::Borrowed(&**name),
            TypeRef::List(_) => Cow::Borrowed("list"),
            TypeRef::Set(_) => Cow::Borrowed("set"),
            TypeRef::Map(_) => Cow::Borrowed("map"),
            TypeRef::Any => Cow::Borrowed("any"),
        }
    }

    /// Signature fragment used in checksums.
    pub fn descriptor(&self) -> String {
        match self {
            TypeRef::Primitive(p) => p.name().to_string(),
            TypeRef::String => "string".to_string(),
            TypeRef::BigInteger => "big_integer".to_string(),
            TypeRef::BigDecimal => "big_decimal".to_string(),
            TypeRef::Array(p) => format!("[{}", p.name()),
            TypeRef::Enum(name) => format!("E<{}>", name),
            TypeRef::Class(name) => format!("L<{}>", name),
            TypeRef::List(None) => "list".to_string(),
            TypeRef::List(Some(e)) => format!("list<{}>", e.descriptor()),
            TypeRef::Set(None) => "set".to_string(),
            TypeRef::Set(Some(e)) => format!("set<{}>", e.descriptor()),
            TypeRef::Map(None) => "map".to_string(),
            TypeRef::Map(Some((k, v))) => format!("map<{},{}>", k.descriptor(), v.descriptor()),
            TypeRef::Any => "*".to_string(),
        }
    }

    /// Class and enum names this type depends on, including container elements.
    pub fn referenced_names(&self) -> Vec<Arc<str>> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut Vec<Arc<str>>) {
        match self {
            TypeRef::Enum(name) | TypeRef::Class(name) => names.push(name.clone()),
            TypeRef::List(Some(e)) | TypeRef::Set(Some(e)) => e.collect_names(names),
            TypeRef::Map(Some((k, v))) => {
                k.collect_names(names);
                v.collect_names(names);
            }
            _ => {}
        }
    }
}

fn bind(element: TypeRef) -> Option<Box<TypeRef>> {
    match element {
        TypeRef::Any => None,
        other => Some(Box::new(other)),
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}

impl From<Primitive> for TypeRef {
    fn from(p: Primitive) -> Self {
        TypeRef::Primitive(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_element_is_raw() {
        assert_eq!(TypeRef::list(TypeRef::Any), TypeRef::List(None));
        assert_eq!(TypeRef::map(TypeRef::String, TypeRef::Any), TypeRef::Map(None));
        assert_eq!(
            TypeRef::set(TypeRef::String),
            TypeRef::Set(Some(Box::new(TypeRef::String)))
        );
    }

    #[test]
    fn test_descriptors() {
        assert_eq!(TypeRef::Array(Primitive::Int).descriptor(), "[i32");
        assert_eq!(
            TypeRef::map(TypeRef::String, TypeRef::class("acme::Foo")).descriptor(),
            "map<string,L<acme::Foo>>"
        );
        assert_eq!(TypeRef::list(TypeRef::Any).descriptor(), "list");
    }

    #[test]
    fn test_referenced_names() {
        let ty = TypeRef::map(
            TypeRef::enumeration("acme::Color"),
            TypeRef::list(TypeRef::class("acme::Foo")),
        );
        let names: Vec<String> = ty.referenced_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, ["acme::Color", "acme::Foo"]);
    }

    #[test]
    fn test_widths() {
        let total: usize = Primitive::ALL.iter().map(|p| p.width()).sum();
        assert_eq!(total, 1 + 1 + 4 + 2 + 4 + 8 + 4 + 8);
    }
}
