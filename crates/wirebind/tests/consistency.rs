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

//! Class-definition exchange between peers
//!
//! Each test builds two serializers standing in for the two ends of a
//! connection and swaps their containers the way a handshake would.

use std::fs;
use std::sync::Arc;

use wirebind::registry::verify;
use wirebind::{
    ClassDefinition, ClassDefinitionContainer, ComparisonStrategy, Error, ErrorKind, Marshal,
    Serializer, TypeRef, Value,
};

#[derive(Marshal, Debug, Default, Clone, PartialEq)]
#[marshal(name = "acme::Foo")]
struct Foo {
    id: i32,
    name: String,
}

/// `acme::Bar` with one property, optionally a second one.
fn peer(comparison: ComparisonStrategy, extra_property: bool) -> Serializer {
    Serializer::builder()
        .comparison(comparison)
        .register::<Foo>()
        .register_dynamic("acme::Bar", |class| {
            class.legacy_id(7);
            class.property("x", TypeRef::Primitive(wirebind::Primitive::Int));
            if extra_property {
                class.nullable_property("y", TypeRef::String);
            }
        })
        .build()
        .expect("peer builds")
}

#[test]
fn test_identical_registries_accept_each_other() {
    let a = peer(ComparisonStrategy::ChecksumBased, false);
    let b = peer(ComparisonStrategy::ChecksumBased, false);

    let wire = b.local_class_definitions().to_bytes().expect("encode container");
    let remote = ClassDefinitionContainer::from_bytes(&wire).expect("decode container");
    assert_eq!(remote.len(), b.local_class_definitions().len());
    a.set_class_definition_container(remote).expect("consistent");

    let foo = Foo {
        id: 10000,
        name: "SomeName".into(),
    };
    let bytes = a.encode(&foo).expect("encode");
    assert_eq!(b.decode::<Foo>(&bytes).expect("decode"), foo);
}

#[test]
fn test_definitions_are_deterministic() {
    let a = peer(ComparisonStrategy::ChecksumBased, false);
    let b = peer(ComparisonStrategy::ChecksumBased, false);
    for def in a.local_class_definitions().iter() {
        let other = b
            .local_class_definitions()
            .by_name(def.canonical_name())
            .expect("same classes");
        assert_eq!(def, other);
    }
}

#[test]
fn test_changed_class_rejected_by_checksum() {
    let a = peer(ComparisonStrategy::ChecksumBased, false);
    let b = peer(ComparisonStrategy::ChecksumBased, true);

    let err = a
        .set_class_definition_container(b.local_class_definitions().clone())
        .expect_err("shapes differ");
    assert_eq!(err.kind(), ErrorKind::SchemaInconsistent);
    match &err {
        Error::SchemaInconsistent { canonical_name, .. } => assert_eq!(canonical_name, "acme::Bar"),
        other => panic!("expected SchemaInconsistent, got {:?}", other),
    }
}

#[test]
fn test_skip_comparison_accepts_changed_class() {
    let a = peer(ComparisonStrategy::SkipComparison, false);
    let b = peer(ComparisonStrategy::SkipComparison, true);
    a.set_class_definition_container(b.local_class_definitions().clone())
        .expect("comparison skipped");
}

#[test]
fn test_pinned_legacy_ids_accept_changed_class() {
    let a = peer(ComparisonStrategy::LegacyIdBased, false);
    let b = peer(ComparisonStrategy::LegacyIdBased, true);
    let bar_a = a.local_class_definitions().by_name("acme::Bar").expect("bar");
    let bar_b = b.local_class_definitions().by_name("acme::Bar").expect("bar");
    assert_eq!(bar_a.legacy_id(), Some(7));
    assert_ne!(bar_a.checksum(), bar_b.checksum());

    a.set_class_definition_container(b.local_class_definitions().clone())
        .expect("legacy ids match");
}

#[test]
fn test_hand_built_containers() {
    let foo = ClassDefinition::new("Foo", 0xAA, [1; 16], None);
    let bar = ClassDefinition::new("Bar", 0xBB, [2; 16], None);
    let local = ClassDefinitionContainer::from_definitions([foo.clone(), bar]).expect("local");

    let same = ClassDefinitionContainer::from_definitions([
        foo.clone(),
        ClassDefinition::new("Bar", 0xBB, [2; 16], None),
    ])
    .expect("same");
    verify(&local, &same, ComparisonStrategy::ChecksumBased).expect("identical");

    let drifted = ClassDefinitionContainer::from_definitions([
        foo,
        ClassDefinition::new("Bar", 0xBB, [3; 16], None),
    ])
    .expect("drifted");
    let err = verify(&local, &drifted, ComparisonStrategy::ChecksumBased).expect_err("drift");
    assert!(err.to_string().contains("Bar"));
    verify(&local, &drifted, ComparisonStrategy::SkipComparison).expect("skip");
}

#[test]
fn test_duplicate_definitions_rejected() {
    let result = ClassDefinitionContainer::from_definitions([
        ClassDefinition::new("Foo", 0xAA, [1; 16], None),
        ClassDefinition::new("Other", 0xAA, [1; 16], None),
    ]);
    assert!(matches!(result, Err(Error::DuplicateBinding { .. })));
}

#[test]
fn test_rejected_swap_keeps_active_container() {
    let a = peer(ComparisonStrategy::ChecksumBased, false);
    let b = peer(ComparisonStrategy::ChecksumBased, true);

    let before = a.class_definition_container();
    assert!(a
        .set_class_definition_container(b.local_class_definitions().clone())
        .is_err());
    assert!(Arc::ptr_eq(&before, &a.class_definition_container()));
}

#[test]
fn test_accepted_swap_replaces_active_container() {
    let a = peer(ComparisonStrategy::ChecksumBased, false);
    let b = peer(ComparisonStrategy::ChecksumBased, false);

    let before = a.class_definition_container();
    a.set_class_definition_container(b.local_class_definitions().clone())
        .expect("consistent");
    assert!(!Arc::ptr_eq(&before, &a.class_definition_container()));
}

#[test]
fn test_remote_only_class_cannot_be_decoded() {
    let a = peer(ComparisonStrategy::SkipComparison, false);
    let mut remote = a.local_class_definitions().clone();
    remote
        .push(ClassDefinition::new("acme::Ghost", 77, [0; 16], None))
        .expect("fresh id");
    a.set_class_definition_container(remote).expect("skip");

    let bytes = 77i64.to_be_bytes();
    match a.from_bytes(&bytes) {
        Err(Error::UnknownCanonicalName(name)) => assert_eq!(name, "acme::Ghost"),
        other => panic!("expected UnknownCanonicalName, got {:?}", other),
    }
}

#[test]
fn test_in_flight_snapshot_unaffected_by_swap() {
    let a = peer(ComparisonStrategy::ChecksumBased, false);
    let snapshot = a.class_definition_container();
    a.set_class_definition_container(a.local_class_definitions().clone())
        .expect("self is consistent");
    // the old snapshot is still whole
    assert_eq!(snapshot.len(), a.local_class_definitions().len());
    assert!(snapshot.by_name("acme::Foo").is_some());

    let value = Foo::default();
    let bytes = a.encode(&value).expect("encode after swap");
    assert_eq!(a.decode::<Foo>(&bytes).expect("decode"), value);
}

#[test]
fn test_debug_dump_written_on_build_and_swap() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("classes.txt");

    let s = Serializer::builder()
        .debug_dump_path(&path)
        .register::<Foo>()
        .build()
        .expect("build");
    let text = fs::read_to_string(&path).expect("dump written at build");
    assert!(text.starts_with("# local"));
    assert!(text.contains("acme::Foo"));

    s.set_class_definition_container(s.local_class_definitions().clone())
        .expect("consistent");
    let text = fs::read_to_string(&path).expect("dump rewritten");
    assert!(text.starts_with("# active"));
}

#[test]
fn test_unwritable_dump_path_is_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("classes.txt");
    let s = Serializer::builder()
        .debug_dump_path(&path)
        .register::<Foo>()
        .build()
        .expect("dump failures only log");
    assert!(!path.exists());
    s.to_bytes(&Value::String("still works".into())).expect("serialize");
}
