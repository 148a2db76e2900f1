// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Exchangeable set of class definitions.
//!
//! Wire layout:
//!
//! ```text
//! [i32 count]
//! count x [i64 id][utf canonical name][16-byte checksum][i64 legacy id, 0 = none]
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use super::ClassDefinition;
use crate::error::{Error, Result};
use crate::io::{DataInput, DataOutput};

/// Ordered set of [`ClassDefinition`]s indexed by id and canonical name.
#[derive(Debug, Clone, Default)]
pub struct ClassDefinitionContainer {
    definitions: Vec<ClassDefinition>,
    by_id: HashMap<i64, usize>,
    by_name: HashMap<Arc<str>, usize>,
}

impl ClassDefinitionContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from definitions, rejecting duplicate ids or names.
    pub fn from_definitions(definitions: impl IntoIterator<Item = ClassDefinition>) -> Result<Self> {
        let mut container = Self::new();
        for def in definitions {
            container.push(def)?;
        }
        Ok(container)
    }

    pub fn push(&mut self, definition: ClassDefinition) -> Result<()> {
        if self.by_name.contains_key(definition.canonical_name())
            || self.by_id.contains_key(&definition.id())
        {
            return Err(Error::DuplicateBinding {
                canonical_name: definition.canonical_name().to_string(),
            });
        }
        let index = self.definitions.len();
        self.by_id.insert(definition.id(), index);
        self.by_name
            .insert(definition.canonical_name_arc().clone(), index);
        self.definitions.push(definition);
        Ok(())
    }

    pub fn by_id(&self, id: i64) -> Option<&ClassDefinition> {
        self.by_id.get(&id).map(|&i| &self.definitions[i])
    }

    pub fn by_name(&self, canonical_name: &str) -> Option<&ClassDefinition> {
        self.by_name
            .get(canonical_name)
            .map(|&i| &self.definitions[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn encode(&self, out: &mut DataOutput<'_>) -> Result<()> {
        out.write_len(self.definitions.len())?;
        for def in &self.definitions {
            out.write_i64(def.id())?;
            out.write_utf(def.canonical_name())?;
            out.write_bytes(def.checksum())?;
            out.write_i64(def.legacy_id().unwrap_or(0))?;
        }
        Ok(())
    }

    pub fn decode(input: &mut DataInput<'_>) -> Result<Self> {
        let count = input.read_len()?;
        let mut container = Self::new();
        for _ in 0..count {
            let offset = input.offset();
            let id = input.read_i64()?;
            let name = input.read_utf()?;
            let mut checksum = [0u8; 16];
            input.read_exact(&mut checksum)?;
            let legacy = input.read_i64()?;
            let legacy = (legacy != 0).then_some(legacy);
            container
                .push(ClassDefinition::new(name, id, checksum, legacy))
                .map_err(|_| Error::InvalidData {
                    offset,
                    reason: format!("duplicate class definition {:#018x}", id),
                })?;
        }
        Ok(container)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut DataOutput::new(&mut buf))?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut slice = bytes;
        Self::decode(&mut DataInput::new(&mut slice))
    }
}

impl PartialEq for ClassDefinitionContainer {
    fn eq(&self, other: &Self) -> bool {
        self.definitions == other.definitions
    }
}

impl Eq for ClassDefinitionContainer {}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, id: i64, legacy: Option<i64>) -> ClassDefinition {
        ClassDefinition::new(name, id, [id as u8; 16], legacy)
    }

    #[test]
    fn test_indexes() {
        let container = ClassDefinitionContainer::from_definitions([
            def("Foo", 0xAA, Some(1)),
            def("Bar", 0xBB, None),
        ])
        .expect("container");
        assert_eq!(container.len(), 2);
        assert_eq!(container.by_id(0xBB).map(|d| d.canonical_name()), Some("Bar"));
        assert_eq!(container.by_name("Foo").map(|d| d.id()), Some(0xAA));
        assert!(container.by_id(0xCC).is_none());
    }

    #[test]
    fn test_duplicates_rejected() {
        let dup_name = ClassDefinitionContainer::from_definitions([
            def("Foo", 1, None),
            def("Foo", 2, None),
        ]);
        assert!(matches!(dup_name, Err(Error::DuplicateBinding { .. })));

        let dup_id = ClassDefinitionContainer::from_definitions([
            def("Foo", 1, None),
            def("Bar", 1, None),
        ]);
        assert!(dup_id.is_err());
    }

    #[test]
    fn test_wire_layout() {
        let container =
            ClassDefinitionContainer::from_definitions([def("Foo", 0xAA, None)]).expect("container");
        let bytes = container.to_bytes().expect("encode");
        // count + id + utf("Foo") + checksum + legacy
        assert_eq!(bytes.len(), 4 + 8 + (4 + 2 + 3) + 16 + 8);
        assert_eq!(&bytes[..4], &1i32.to_be_bytes());
        assert_eq!(&bytes[4..12], &0xAAi64.to_be_bytes());
        assert_eq!(&bytes[bytes.len() - 8..], &0i64.to_be_bytes());

        let back = ClassDefinitionContainer::from_bytes(&bytes).expect("decode");
        assert_eq!(back, container);
        assert_eq!(back.by_name("Foo").and_then(|d| d.legacy_id()), None);
    }

    #[test]
    fn test_truncated_container() {
        let container = ClassDefinitionContainer::from_definitions([def("Foo", 7, Some(3))])
            .expect("container");
        let bytes = container.to_bytes().expect("encode");
        for cut in 0..bytes.len() {
            assert!(ClassDefinitionContainer::from_bytes(&bytes[..cut]).is_err());
        }
    }
}
