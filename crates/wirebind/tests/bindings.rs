// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::items_after_statements)] // Test helpers
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::wildcard_imports)] // Test utility imports
#![allow(clippy::similar_names)] // Test variable naming
#![allow(clippy::cast_possible_truncation)] // Test parameters
#![allow(clippy::cast_possible_wrap)] // Test conversions

//! Binding options: schema-only classes, marshaller overrides,
//! self-describing classes, custom instantiation and build-time errors.

use std::sync::Arc;

use wirebind::{
    ClassBuilder, ClassSchema, DataInput, DataOutput, DynamicObject, EnumValue, Error, ErrorKind,
    ExternalMarshal, Marshal, Marshallable, Marshaller, ObjectInstantiator, ObjectRef, Primitive,
    PropertyValue, Result, SerializationContext, SerializationStrategy, Serializer, Streamed,
    TypeRef, Value,
};

#[derive(Marshal, Debug, Default, Clone, PartialEq)]
#[marshal(name = "acme::Foo")]
struct Foo {
    id: i32,
    name: String,
}

/// String codec that stores text rotated by 13 letters.
struct Rot13;

fn rot13(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'a'..='z' => char::from((c as u8 - b'a' + 13) % 26 + b'a'),
            'A'..='Z' => char::from((c as u8 - b'A' + 13) % 26 + b'A'),
            other => other,
        })
        .collect()
}

impl Marshaller for Rot13 {
    fn name(&self) -> &str {
        "rot13"
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
        let text = value.as_str().ok_or_else(|| Error::TypeMismatch {
            expected: "string".into(),
            found: value.kind_name(),
        })?;
        out.write_utf(&rot13(text))
    }

    fn unmarshall(
        &self,
        input: &mut DataInput<'_>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<Value> {
        Ok(Value::String(rot13(&input.read_utf()?)))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Secret {
    id: i32,
    code: String,
    label: String,
}

impl Marshallable for Secret {
    fn canonical_name() -> &'static str {
        "acme::Secret"
    }

    fn describe(class: &mut ClassBuilder<Self>) {
        class
            .property("id", |s| &s.id, |s| &mut s.id)
            .property("code", |s| &s.code, |s| &mut s.code)
            .property("label", |s| &s.label, |s| &mut s.label)
            .property_marshaller("code", Arc::new(Rot13));
    }
}

impl PropertyValue for Secret {
    fn type_ref() -> TypeRef {
        TypeRef::class(Self::canonical_name())
    }

    fn to_value(&self) -> Value {
        wirebind::object_to_value(self)
    }

    fn from_value(value: Value) -> Result<Self> {
        wirebind::object_from_value(value)
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

// ============================================================================
// Schema-only classes
// ============================================================================

#[test]
fn test_dynamic_class_roundtrip() {
    let s = Serializer::builder()
        .register::<Foo>()
        .register_enum_constants("acme::Level", &["Low", "High"])
        .register_dynamic("acme::Record", |class| {
            class
                .property("count", TypeRef::Primitive(Primitive::Long))
                .nullable_property("title", TypeRef::String)
                .property("level", TypeRef::enumeration("acme::Level"))
                .property("tags", TypeRef::list(TypeRef::String))
                .nullable_property("owner", TypeRef::class("acme::Foo"))
                .property("extra", TypeRef::list(TypeRef::Any));
        })
        .build()
        .expect("build");

    let owner = Foo {
        id: 3,
        name: "owner".into(),
    };
    let record = DynamicObject::new("acme::Record")
        .with("count", 42i64)
        .with("title", Value::Null)
        .with("level", EnumValue::new("acme::Level", 1))
        .with(
            "tags",
            Value::List(vec![Value::from("a"), Value::Null, Value::from("b")]),
        )
        .with("owner", owner.to_value())
        .with(
            "extra",
            Value::List(vec![Value::Int(1), Value::from("two"), Value::Double(3.0)]),
        );

    let bytes = s
        .to_bytes(&Value::Object(record.clone().into_object()))
        .expect("serialize");
    let back = s.from_bytes(&bytes).expect("deserialize");
    let back = back
        .as_object()
        .and_then(|o| o.read(|d: &DynamicObject| d.clone()))
        .expect("dynamic object");

    assert_eq!(back.canonical_name(), "acme::Record");
    for name in ["count", "title", "level", "tags", "extra"] {
        assert_eq!(back.get(name), record.get(name), "property {}", name);
    }
    let decoded_owner = back.get("owner").cloned().expect("owner");
    assert_eq!(Foo::from_value(decoded_owner).expect("foo"), owner);
}

#[test]
fn test_dynamic_missing_required_property() {
    let s = Serializer::builder()
        .register_dynamic("acme::Point", |class| {
            class
                .property("x", TypeRef::Primitive(Primitive::Int))
                .property("y", TypeRef::Primitive(Primitive::Int));
        })
        .build()
        .expect("build");

    let half = DynamicObject::new("acme::Point").with("x", 1).into_object();
    assert!(s.to_bytes(&Value::Object(half)).is_err());
}

#[test]
fn test_enum_constants_by_name() {
    let s = Serializer::builder()
        .register_enum_constants("acme::Level", &["Low", "High"])
        .build()
        .expect("build");

    let value = Value::Enum(EnumValue::new("acme::Level", 1));
    let back = s.from_bytes(&s.to_bytes(&value).expect("serialize")).expect("deserialize");
    assert_eq!(back, value);

    let bad = Value::Enum(EnumValue::new("acme::Level", 5));
    assert!(s.to_bytes(&bad).is_err());
}

// ============================================================================
// Marshaller overrides
// ============================================================================

#[test]
fn test_property_marshaller_override() {
    let s = Serializer::builder()
        .register::<Secret>()
        .build()
        .expect("build");
    let secret = Secret {
        id: 1,
        code: "Hello".into(),
        label: "Hello".into(),
    };

    let bytes = s.encode(&secret).expect("encode");
    // only the overridden property is rotated
    assert!(contains(&bytes, b"Uryyb"));
    assert!(contains(&bytes, b"Hello"));
    assert_eq!(s.decode::<Secret>(&bytes).expect("decode"), secret);
}

#[test]
fn test_global_marshaller_override() {
    let s = Serializer::builder()
        .register::<Foo>()
        .marshaller_override(TypeRef::String, Arc::new(Rot13))
        .build()
        .expect("build");

    let foo = Foo {
        id: 5,
        name: "Hello".into(),
    };
    let bytes = s.encode(&foo).expect("encode");
    assert!(contains(&bytes, b"Uryyb"));
    assert_eq!(s.decode::<Foo>(&bytes).expect("decode"), foo);

    let top = s.to_bytes(&Value::from("abc")).expect("top-level string");
    assert!(contains(&top, b"nop"));
    assert_eq!(s.from_bytes(&top).expect("decode"), Value::from("abc"));
}

#[test]
fn test_class_marshaller() {
    /// Writes only the `v` property as a bare int.
    struct Compact;

    impl Marshaller for Compact {
        fn name(&self) -> &str {
            "compact"
        }

        fn accepts(&self, type_ref: &TypeRef) -> bool {
            *type_ref == TypeRef::class("acme::Counter")
        }

        fn marshall(
            &self,
            value: &Value,
            out: &mut DataOutput<'_>,
            _ctx: &mut SerializationContext<'_>,
        ) -> Result<()> {
            let v = value
                .as_object()
                .and_then(|o| o.read(|d: &DynamicObject| d.get("v").cloned()))
                .flatten();
            match v {
                Some(Value::Int(v)) => out.write_i32(v),
                other => Err(Error::TypeMismatch {
                    expected: "int".into(),
                    found: format!("{:?}", other),
                }),
            }
        }

        fn unmarshall(
            &self,
            input: &mut DataInput<'_>,
            _ctx: &mut SerializationContext<'_>,
        ) -> Result<Value> {
            let v = input.read_i32()?;
            Ok(Value::Object(
                DynamicObject::new("acme::Counter").with("v", v).into_object(),
            ))
        }
    }

    let s = Serializer::builder()
        .register_dynamic("acme::Counter", |class| {
            class
                .property("v", TypeRef::Primitive(Primitive::Int))
                .marshaller(Arc::new(Compact));
        })
        .build()
        .expect("build");

    let counter = DynamicObject::new("acme::Counter").with("v", 77).into_object();
    let bytes = s.to_bytes(&Value::Object(counter)).expect("serialize");
    assert_eq!(bytes.len(), 8 + 4);
    assert_eq!(&bytes[8..], &77i32.to_be_bytes());
}

// ============================================================================
// Build-time errors
// ============================================================================

#[test]
fn test_incompatible_property_marshaller() {
    let err = Serializer::builder()
        .register_dynamic("acme::Bad", |class| {
            class
                .property("n", TypeRef::Primitive(Primitive::Int))
                .property_marshaller("n", Arc::new(Rot13));
        })
        .build()
        .expect_err("rot13 cannot encode an int");
    assert_eq!(err.kind(), ErrorKind::Configuration);
    match err {
        Error::IncompatibleMarshaller {
            marshaller,
            type_name,
        } => {
            assert_eq!(marshaller, "rot13");
            assert!(type_name.contains("acme::Bad::n"));
        }
        other => panic!("expected IncompatibleMarshaller, got {:?}", other),
    }
}

#[test]
fn test_incompatible_global_override() {
    let result = Serializer::builder()
        .marshaller_override(TypeRef::Primitive(Primitive::Long), Arc::new(Rot13))
        .build();
    assert!(matches!(result, Err(Error::IncompatibleMarshaller { .. })));
}

#[test]
fn test_override_for_unknown_property() {
    let result = Serializer::builder()
        .register_dynamic("acme::Bad", |class| {
            class
                .property("name", TypeRef::String)
                .property_marshaller("nmae", Arc::new(Rot13));
        })
        .build();
    match result {
        Err(Error::MissingProperty {
            canonical_name,
            property,
        }) => {
            assert_eq!(canonical_name, "acme::Bad");
            assert_eq!(property, "nmae");
        }
        other => panic!("expected MissingProperty, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_duplicate_registration() {
    let result = Serializer::builder()
        .register::<Foo>()
        .register::<Foo>()
        .build();
    assert!(matches!(result, Err(Error::DuplicateBinding { .. })));
}

#[test]
fn test_duplicate_property() {
    let result = Serializer::builder()
        .register_dynamic("acme::Twice", |class| {
            class
                .property("x", TypeRef::String)
                .property("x", TypeRef::Primitive(Primitive::Int));
        })
        .build();
    assert!(matches!(result, Err(Error::DuplicateProperty { .. })));
}

#[test]
fn test_unknown_property_type() {
    let result = Serializer::builder()
        .register_dynamic("acme::Holder", |class| {
            class.property("inner", TypeRef::list(TypeRef::class("acme::Nowhere")));
        })
        .build();
    match result {
        Err(Error::UnknownPropertyType {
            canonical_name,
            property,
            type_name,
        }) => {
            assert_eq!(canonical_name, "acme::Holder");
            assert_eq!(property, "inner");
            assert_eq!(type_name, "acme::Nowhere");
        }
        other => panic!("expected UnknownPropertyType, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_invalid_config_rejected() {
    let result = Serializer::builder().max_depth(0).build();
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

// ============================================================================
// Self-describing classes
// ============================================================================

#[derive(Marshal, Debug, Default, Clone, PartialEq)]
#[marshal(name = "geo::Point", streamed)]
struct Point {
    x: i32,
    y: i32,
}

impl Streamed for Point {
    fn write_stream(&self, out: &mut DataOutput<'_>) -> Result<()> {
        out.write_i32(self.x)?;
        out.write_i32(self.y)
    }

    fn read_stream(&mut self, input: &mut DataInput<'_>) -> Result<()> {
        self.x = input.read_i32()?;
        self.y = input.read_i32()?;
        Ok(())
    }
}

#[derive(Marshal, Debug, Default, Clone)]
#[marshal(name = "acme::Envelope", external)]
struct Envelope {
    label: String,
    payload: Value,
}

impl ExternalMarshal for Envelope {
    fn write_external(
        &self,
        out: &mut DataOutput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        out.write_utf(&self.label)?;
        ctx.write_value(&self.payload, out)
    }

    fn read_external(
        &mut self,
        input: &mut DataInput<'_>,
        ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        self.label = input.read_utf()?;
        self.payload = ctx.read_value(input)?;
        Ok(())
    }
}

#[test]
fn test_streamed_class() {
    for strategy in [
        SerializationStrategy::SpeedOptimized,
        SerializationStrategy::SizeOptimized,
    ] {
        let s = Serializer::builder()
            .strategy(strategy)
            .register::<Point>()
            .build()
            .expect("build");
        let point = Point { x: -4, y: 9 };
        let bytes = s.encode(&point).expect("encode");
        assert_eq!(s.decode::<Point>(&bytes).expect("decode"), point);

        let framing = match strategy {
            SerializationStrategy::SpeedOptimized => 8,
            SerializationStrategy::SizeOptimized => 16,
        };
        assert_eq!(bytes.len(), framing + 8);
    }
}

#[test]
fn test_external_class_keeps_shared_payload() {
    let s = Serializer::builder()
        .strategy(SerializationStrategy::SizeOptimized)
        .register::<Foo>()
        .register::<Envelope>()
        .build()
        .expect("build");

    let foo = ObjectRef::new(Foo {
        id: 1,
        name: "inside".into(),
    });
    let envelope = Envelope {
        label: "batch".into(),
        payload: Value::List(vec![Value::Object(foo.clone()), Value::Object(foo)]),
    };

    let back: Envelope = s.decode(&s.encode(&envelope).expect("encode")).expect("decode");
    assert_eq!(back.label, "batch");
    let Value::List(items) = back.payload else {
        panic!("expected a list payload");
    };
    let first = items[0].as_object().expect("object");
    let second = items[1].as_object().expect("object");
    assert!(first.ptr_eq(second));
    assert_eq!(
        first.read(|f: &Foo| f.name.clone()).expect("a Foo"),
        "inside"
    );
}

// ============================================================================
// Instantiation
// ============================================================================

/// Refuses to allocate `acme::Foo`.
struct Refuse;

impl ObjectInstantiator for Refuse {
    fn new_instance(&self, schema: &ClassSchema) -> Option<ObjectRef> {
        if schema.canonical_name() == "acme::Foo" {
            return None;
        }
        schema.new_instance()
    }
}

#[test]
fn test_custom_instantiator() {
    let s = Serializer::builder()
        .register::<Foo>()
        .instantiator(Arc::new(Refuse))
        .build()
        .expect("build");

    let bytes = s.encode(&Foo::default()).expect("encode");
    match s.from_bytes(&bytes) {
        Err(Error::InstantiationFailed(name)) => assert_eq!(name, "acme::Foo"),
        other => panic!("expected InstantiationFailed, got {:?}", other),
    }
}
