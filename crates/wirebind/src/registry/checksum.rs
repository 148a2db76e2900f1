// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural hashing of class shapes.
//!
//! All hashes are MD5 over a canonical text form of the shape:
//!
//! - checksum: full digest of the concatenated `(name)::descriptor` property
//!   signatures, sorted by property name (`?` marks a nullable property).
//!   Enums hash `(CONSTANT)::ordinal` in declaration order.
//! - id: first 8 digest bytes (big-endian) over the kind, canonical name and
//!   the same signature text.
//! - legacy id: first 8 digest bytes over a second form that also lists
//!   nullability explicitly, unless the class pins one.

use std::sync::Arc;

use md5::{Digest, Md5};

use super::ClassDefinition;
use crate::types::TypeRef;

/// One property as seen by the hashing functions.
pub(crate) struct PropertySignature<'a> {
    pub name: &'a str,
    pub type_ref: &'a TypeRef,
    pub nullable: bool,
}

/// Shape of a class for hashing purposes.
pub(crate) enum Shape<'a> {
    Object(Vec<PropertySignature<'a>>),
    Enum(&'a [Arc<str>]),
    Builtin,
}

fn digest(text: &str) -> [u8; 16] {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    let result = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&result);
    bytes
}

fn digest64(text: &str) -> i64 {
    let full = digest(text);
    let mut head = [0u8; 8];
    head.copy_from_slice(&full[..8]);
    i64::from_be_bytes(head)
}

pub(crate) fn signature(name: &str, type_ref: &TypeRef, nullable: bool) -> String {
    let marker = if nullable { "?" } else { "" };
    format!("({})::{}{}", name, type_ref.descriptor(), marker)
}

/// Compute the definition of `canonical_name` with the given shape.
pub(crate) fn compute(
    canonical_name: &str,
    shape: Shape<'_>,
    pinned_legacy_id: Option<i64>,
) -> ClassDefinition {
    match shape {
        Shape::Object(mut properties) => {
            properties.sort_by(|a, b| a.name.cmp(b.name));
            let signatures: String = properties
                .iter()
                .map(|p| signature(p.name, p.type_ref, p.nullable))
                .collect();
            let legacy_form: String = properties
                .iter()
                .map(|p| format!("{}:{}:{};", p.name, p.type_ref.descriptor(), u8::from(p.nullable)))
                .collect();

            let id = digest64(&format!("class:{}|{}", canonical_name, signatures));
            let legacy = pinned_legacy_id
                .unwrap_or_else(|| digest64(&format!("legacy:{};{}", canonical_name, legacy_form)));
            ClassDefinition::new(canonical_name, id, digest(&signatures), Some(legacy))
        }
        Shape::Enum(constants) => {
            let signatures: String = constants
                .iter()
                .enumerate()
                .map(|(ordinal, c)| format!("({})::{}", c, ordinal))
                .collect();
            let joined = constants
                .iter()
                .map(|c| &**c)
                .collect::<Vec<_>>()
                .join(",");

            let id = digest64(&format!("enum:{}|{}", canonical_name, signatures));
            let legacy = pinned_legacy_id
                .unwrap_or_else(|| digest64(&format!("legacy:{};{}", canonical_name, joined)));
            ClassDefinition::new(canonical_name, id, digest(&signatures), Some(legacy))
        }
        Shape::Builtin => {
            let form = format!("builtin:{}", canonical_name);
            ClassDefinition::new(canonical_name, digest64(&form), digest(&form), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    fn foo(props: &[(&'static str, TypeRef, bool)]) -> ClassDefinition {
        let sigs = props
            .iter()
            .map(|(name, type_ref, nullable)| PropertySignature {
                name,
                type_ref,
                nullable: *nullable,
            })
            .collect();
        compute("acme::Foo", Shape::Object(sigs), None)
    }

    #[test]
    fn test_signature_format() {
        assert_eq!(
            signature("id", &TypeRef::Primitive(Primitive::Int), false),
            "(id)::i32"
        );
        assert_eq!(signature("name", &TypeRef::String, true), "(name)::string?");
    }

    #[test]
    fn test_declaration_order_irrelevant() {
        let a = foo(&[
            ("id", TypeRef::Primitive(Primitive::Int), false),
            ("name", TypeRef::String, false),
        ]);
        let b = foo(&[
            ("name", TypeRef::String, false),
            ("id", TypeRef::Primitive(Primitive::Int), false),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_extra_property_changes_hashes() {
        let a = foo(&[("id", TypeRef::Primitive(Primitive::Int), false)]);
        let b = foo(&[
            ("id", TypeRef::Primitive(Primitive::Int), false),
            ("extra", TypeRef::String, false),
        ]);
        assert_ne!(a.checksum(), b.checksum());
        assert_ne!(a.id(), b.id());
        assert_ne!(a.legacy_id(), b.legacy_id());
    }

    #[test]
    fn test_nullability_changes_checksum() {
        let a = foo(&[("name", TypeRef::String, false)]);
        let b = foo(&[("name", TypeRef::String, true)]);
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn test_enum_order_matters() {
        let ab: Vec<Arc<str>> = vec!["A".into(), "B".into()];
        let ba: Vec<Arc<str>> = vec!["B".into(), "A".into()];
        let x = compute("acme::E", Shape::Enum(&ab), None);
        let y = compute("acme::E", Shape::Enum(&ba), None);
        assert_ne!(x.checksum(), y.checksum());
    }

    #[test]
    fn test_pinned_legacy_id() {
        let def = compute("acme::Foo", Shape::Object(Vec::new()), Some(42));
        assert_eq!(def.legacy_id(), Some(42));
        assert_eq!(compute("i32", Shape::Builtin, None).legacy_id(), None);
    }
}
