// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use wirebind::{Marshal, SerializationStrategy, Serializer, Shared, Value};

#[derive(Marshal, Default, Clone)]
#[marshal(name = "fuzz::Node")]
struct Node {
    id: i32,
    label: Option<String>,
    weights: Vec<f32>,
    next: Option<Shared<Node>>,
    extra: Value,
}

fn serializers() -> &'static [Serializer; 2] {
    static SERIALIZERS: OnceLock<[Serializer; 2]> = OnceLock::new();
    SERIALIZERS.get_or_init(|| {
        let build = |strategy| {
            Serializer::builder()
                .strategy(strategy)
                .max_depth(32)
                .register::<Node>()
                .register_enum_constants("fuzz::Kind", &["A", "B", "C"])
                .build()
                .expect("fuzz serializer")
        };
        [
            build(SerializationStrategy::SpeedOptimized),
            build(SerializationStrategy::SizeOptimized),
        ]
    })
}

fuzz_target!(|data: &[u8]| {
    for s in serializers() {
        // Fuzz whole-buffer decoding
        let _ = s.from_bytes(data);

        // Consumed count never exceeds the input
        if let Ok((_, consumed)) = s.deserialize_from(data) {
            assert!(consumed <= data.len());
        }
    }
});
