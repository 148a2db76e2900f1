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

//! One serializer shared by many threads while the active container is
//! swapped underneath them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use wirebind::{shared, ComparisonStrategy, Marshal, SerializationStrategy, Serializer, Shared};

#[derive(Marshal, Debug, Default, Clone, PartialEq)]
#[marshal(name = "acme::Order")]
struct Order {
    id: i64,
    items: Vec<String>,
    total: f64,
}

#[derive(Marshal, Default, Clone)]
#[marshal(name = "acme::Batch")]
struct Batch {
    orders: Vec<Shared<Order>>,
}

fn order(id: i64) -> Order {
    Order {
        id,
        items: (0..id % 5).map(|i| format!("item-{}", i)).collect(),
        total: id as f64 * 1.5,
    }
}

#[test]
fn test_concurrent_calls_during_swaps() {
    let s = Serializer::builder()
        .comparison(ComparisonStrategy::ChecksumBased)
        .register::<Order>()
        .register::<Batch>()
        .build()
        .expect("build");
    let peer_container = s.local_class_definitions().clone();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        let swapper = scope.spawn(|| {
            let mut swaps = 0;
            while !done.load(Ordering::Relaxed) {
                s.set_class_definition_container(peer_container.clone())
                    .expect("consistent container");
                swaps += 1;
                thread::yield_now();
            }
            swaps
        });

        let workers: Vec<_> = (0..4)
            .map(|t| {
                let s = s.clone();
                scope.spawn(move || {
                    for i in 0..200 {
                        let value = order(t * 1000 + i);
                        let bytes = s.encode(&value).expect("encode");
                        assert_eq!(s.decode::<Order>(&bytes).expect("decode"), value);
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("worker panicked");
        }
        done.store(true, Ordering::Relaxed);
        assert!(swapper.join().expect("swapper panicked") > 0);
    });
}

#[test]
fn test_shared_graph_encoded_from_many_threads() {
    let s = Serializer::builder()
        .strategy(SerializationStrategy::SizeOptimized)
        .register::<Order>()
        .register::<Batch>()
        .build()
        .expect("build");

    let common = shared(order(7));
    let batch = Batch {
        orders: vec![common.clone(), shared(order(8)), common],
    };
    let expected = s.encode(&batch).expect("encode");

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    assert_eq!(s.encode(&batch).expect("encode"), expected);
                }
            });
        }
    });

    let back: Batch = s.decode(&expected).expect("decode");
    assert_eq!(back.orders.len(), 3);
    assert!(std::sync::Arc::ptr_eq(&back.orders[0], &back.orders[2]));
    assert_eq!(*back.orders[1].read(), order(8));
}
