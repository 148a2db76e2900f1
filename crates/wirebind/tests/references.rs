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

//! Object identity and cycle tests
//!
//! Size-optimized calls keep shared instances shared and cycles closed;
//! speed-optimized calls re-encode them and stop at the depth limit.

use std::sync::Arc;

use wirebind::{shared, Error, Marshal, SerializationStrategy, Serializer, Shared};

#[derive(Marshal, Default, Clone)]
#[marshal(name = "graph::Node")]
struct Node {
    name: String,
    next: Option<Shared<Node>>,
}

#[derive(Marshal, Default, Clone)]
#[marshal(name = "graph::Pair")]
struct Pair {
    left: Shared<Node>,
    right: Shared<Node>,
}

fn serializer(strategy: SerializationStrategy) -> Serializer {
    Serializer::builder()
        .strategy(strategy)
        .max_depth(64)
        .register::<Node>()
        .register::<Pair>()
        .build()
        .expect("serializer builds")
}

fn node(name: &str) -> Shared<Node> {
    shared(Node {
        name: name.into(),
        next: None,
    })
}

/// Drop the `next` links so reference cycles do not leak past the test.
fn unlink(start: &Shared<Node>, hops: usize) {
    let mut current = Some(start.clone());
    for _ in 0..hops {
        let Some(n) = current else { break };
        current = n.write().next.take();
    }
}

#[test]
fn test_shared_instance_stays_shared() {
    let s = serializer(SerializationStrategy::SizeOptimized);
    let common = node("common");
    let pair = Pair {
        left: common.clone(),
        right: common,
    };

    let bytes = s.encode(&pair).expect("encode");
    let back: Pair = s.decode(&bytes).expect("decode");
    assert!(Arc::ptr_eq(&back.left, &back.right));
    assert_eq!(back.left.read().name, "common");
}

#[test]
fn test_shared_instance_written_once() {
    let s = serializer(SerializationStrategy::SizeOptimized);
    let common = node("common");
    let shared_pair = Pair {
        left: common.clone(),
        right: common,
    };
    let distinct_pair = Pair {
        left: node("common"),
        right: node("common"),
    };
    let shared_len = s.encode(&shared_pair).expect("encode").len();
    let distinct_len = s.encode(&distinct_pair).expect("encode").len();
    // the second occurrence collapses to its 8-byte reference id
    assert!(shared_len < distinct_len);
}

#[test]
fn test_speed_mode_duplicates_instances() {
    let s = serializer(SerializationStrategy::SpeedOptimized);
    let common = node("common");
    let pair = Pair {
        left: common.clone(),
        right: common,
    };

    let bytes = s.encode(&pair).expect("encode");
    let back: Pair = s.decode(&bytes).expect("decode");
    assert!(!Arc::ptr_eq(&back.left, &back.right));
    assert_eq!(back.left.read().name, back.right.read().name);
}

#[test]
fn test_cycle_roundtrip_size_mode() {
    let s = serializer(SerializationStrategy::SizeOptimized);
    let a = node("a");
    let b = node("b");
    a.write().next = Some(b.clone());
    b.write().next = Some(a.clone());

    let bytes = s.encode(&a).expect("encode");
    let back: Shared<Node> = s.decode(&bytes).expect("decode");

    let second = back.read().next.clone().expect("a -> b");
    assert_eq!(second.read().name, "b");
    let third = second.read().next.clone().expect("b -> a");
    assert!(Arc::ptr_eq(&third, &back));
    assert_eq!(third.read().name, "a");

    unlink(&a, 2);
    unlink(&back, 2);
}

#[test]
fn test_self_reference() {
    let s = serializer(SerializationStrategy::SizeOptimized);
    let a = node("self");
    a.write().next = Some(a.clone());

    let bytes = s.encode(&a).expect("encode");
    let back: Shared<Node> = s.decode(&bytes).expect("decode");
    let next = back.read().next.clone().expect("self link");
    assert!(Arc::ptr_eq(&next, &back));

    unlink(&a, 1);
    unlink(&back, 1);
}

#[test]
fn test_cycle_in_speed_mode_hits_depth_limit() {
    let s = serializer(SerializationStrategy::SpeedOptimized);
    let a = node("a");
    let b = node("b");
    a.write().next = Some(b.clone());
    b.write().next = Some(a.clone());

    assert!(matches!(s.encode(&a), Err(Error::DepthExceeded(64))));
    unlink(&a, 2);
}

#[test]
fn test_long_chain_under_limit() {
    let s = serializer(SerializationStrategy::SpeedOptimized);
    let head = node("0");
    let mut tail = head.clone();
    for i in 1..40 {
        let n = node(&i.to_string());
        tail.write().next = Some(n.clone());
        tail = n;
    }
    let bytes = s.encode(&head).expect("encode");
    let back: Shared<Node> = s.decode(&bytes).expect("decode");

    let mut count = 1;
    let mut current = back.read().next.clone();
    while let Some(n) = current {
        count += 1;
        current = n.read().next.clone();
    }
    assert_eq!(count, 40);
}

#[test]
fn test_forward_reference_rejected() {
    let s = serializer(SerializationStrategy::SizeOptimized);
    let mut bytes = s.encode(&node("x")).expect("encode");
    // the first instance must carry the first reference id
    bytes[8..16].copy_from_slice(&2048i64.to_be_bytes());
    assert!(matches!(
        s.from_bytes(&bytes),
        Err(Error::InvalidReference {
            offset: 8,
            reference: 2048
        })
    ));
}
