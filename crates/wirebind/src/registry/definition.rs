// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;
use std::sync::Arc;

/// Immutable identity of one class: stable id, structural checksum and
/// optional legacy structural id.
///
/// Both `id` and `checksum` are pure functions of the declared shape, so two
/// independently built registries agree on them exactly when the shapes match.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ClassDefinition {
    canonical_name: Arc<str>,
    id: i64,
    checksum: [u8; 16],
    legacy_id: Option<i64>,
}

impl ClassDefinition {
    pub fn new(
        canonical_name: impl Into<Arc<str>>,
        id: i64,
        checksum: [u8; 16],
        legacy_id: Option<i64>,
    ) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            id,
            checksum,
            legacy_id,
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub(crate) fn canonical_name_arc(&self) -> &Arc<str> {
        &self.canonical_name
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn checksum(&self) -> &[u8; 16] {
        &self.checksum
    }

    pub fn legacy_id(&self) -> Option<i64> {
        self.legacy_id
    }

    pub fn checksum_hex(&self) -> String {
        self.checksum.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for ClassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDefinition")
            .field("canonical_name", &self.canonical_name)
            .field("id", &format_args!("{:#018x}", self.id))
            .field("checksum", &self.checksum_hex())
            .field("legacy_id", &self.legacy_id)
            .finish()
    }
}
