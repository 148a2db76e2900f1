// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-only instances.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ObjectRef, Value};

/// Instance of a class registered with
/// [`SerializerBuilder::register_dynamic`](crate::SerializerBuilder::register_dynamic).
///
/// Properties live in a name-keyed map; absent properties read as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicObject {
    canonical_name: Arc<str>,
    properties: BTreeMap<String, Value>,
}

impl DynamicObject {
    pub fn new(canonical_name: impl Into<Arc<str>>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Move into a shared instance named after this object's class.
    pub fn into_object(self) -> ObjectRef {
        ObjectRef::with_name(self.canonical_name.clone(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_object_keeps_name() {
        let obj = DynamicObject::new("acme.Point").with("x", 3).into_object();
        assert_eq!(obj.canonical_name(), "acme.Point");
        let x = obj
            .read(|o: &DynamicObject| o.get("x").cloned())
            .expect("dynamic object");
        assert_eq!(x, Some(Value::Int(3)));
    }
}
