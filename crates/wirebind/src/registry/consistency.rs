// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Verification of a peer's class definitions against the local ones.

use super::ClassDefinitionContainer;
use crate::config::ComparisonStrategy;
use crate::error::{Error, Result};

/// Check every remote definition against the local definition of the same
/// canonical name.
///
/// A remote class with no local counterpart is always inconsistent, except
/// under [`ComparisonStrategy::SkipComparison`], which accepts any container.
pub fn verify(
    local: &ClassDefinitionContainer,
    remote: &ClassDefinitionContainer,
    strategy: ComparisonStrategy,
) -> Result<()> {
    if strategy == ComparisonStrategy::SkipComparison {
        return Ok(());
    }

    for theirs in remote.iter() {
        let name = theirs.canonical_name();
        let Some(ours) = local.by_name(name) else {
            return Err(Error::SchemaInconsistent {
                canonical_name: name.to_string(),
                reason: "class is not registered locally".into(),
            });
        };

        match strategy {
            ComparisonStrategy::ChecksumBased if ours.checksum() != theirs.checksum() => {
                return Err(Error::SchemaInconsistent {
                    canonical_name: name.to_string(),
                    reason: format!(
                        "checksum {} differs from local {}",
                        theirs.checksum_hex(),
                        ours.checksum_hex()
                    ),
                });
            }
            ComparisonStrategy::LegacyIdBased if ours.legacy_id() != theirs.legacy_id() => {
                return Err(Error::SchemaInconsistent {
                    canonical_name: name.to_string(),
                    reason: format!(
                        "legacy id {:?} differs from local {:?}",
                        theirs.legacy_id(),
                        ours.legacy_id()
                    ),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassDefinition;

    fn container(defs: &[(&str, i64, u8, Option<i64>)]) -> ClassDefinitionContainer {
        ClassDefinitionContainer::from_definitions(
            defs.iter()
                .map(|&(name, id, sum, legacy)| ClassDefinition::new(name, id, [sum; 16], legacy)),
        )
        .expect("container")
    }

    #[test]
    fn test_identical_accepted() {
        let local = container(&[("Foo", 0xAA, 1, Some(1)), ("Bar", 0xBB, 2, Some(2))]);
        for strategy in [
            ComparisonStrategy::ChecksumBased,
            ComparisonStrategy::LegacyIdBased,
            ComparisonStrategy::SkipComparison,
        ] {
            verify(&local, &local.clone(), strategy).expect("identical registries");
        }
    }

    #[test]
    fn test_checksum_mismatch_names_class() {
        let local = container(&[("Foo", 0xAA, 1, Some(1)), ("Bar", 0xBB, 2, Some(2))]);
        let remote = container(&[("Bar", 0xBB, 3, Some(2))]);
        match verify(&local, &remote, ComparisonStrategy::ChecksumBased) {
            Err(err @ Error::SchemaInconsistent { .. }) => assert!(err.to_string().contains("Bar")),
            other => panic!("expected SchemaInconsistent, got {:?}", other),
        }
        // same legacy id: legacy comparison does not look at checksums
        verify(&local, &remote, ComparisonStrategy::LegacyIdBased).expect("legacy ids match");
        verify(&local, &remote, ComparisonStrategy::SkipComparison).expect("skip");
    }

    #[test]
    fn test_legacy_mismatch() {
        let local = container(&[("Foo", 0xAA, 1, Some(1))]);
        let remote = container(&[("Foo", 0xAA, 1, Some(9))]);
        assert!(verify(&local, &remote, ComparisonStrategy::LegacyIdBased).is_err());
        verify(&local, &remote, ComparisonStrategy::ChecksumBased).expect("checksums match");
    }

    #[test]
    fn test_unknown_remote_class() {
        let local = container(&[("Foo", 0xAA, 1, None)]);
        let remote = container(&[("Baz", 0xCC, 1, None)]);
        assert!(matches!(
            verify(&local, &remote, ComparisonStrategy::ChecksumBased),
            Err(Error::SchemaInconsistent { .. })
        ));
        verify(&local, &remote, ComparisonStrategy::SkipComparison).expect("skip accepts anything");
    }
}
