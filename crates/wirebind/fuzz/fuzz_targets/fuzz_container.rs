// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use wirebind::registry::verify;
use wirebind::{ClassDefinitionContainer, ComparisonStrategy};

fuzz_target!(|data: &[u8]| {
    // Fuzz container decoding
    let Ok(remote) = ClassDefinitionContainer::from_bytes(data) else {
        return;
    };

    // Decoded containers re-encode and compare cleanly
    let _ = remote.to_bytes();
    let local = ClassDefinitionContainer::new();
    let _ = verify(&local, &remote, ComparisonStrategy::ChecksumBased);
});
