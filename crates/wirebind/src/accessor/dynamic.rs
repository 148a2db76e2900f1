// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::sync::Arc;

use super::{wrong_target, PropertyAccessor};
use crate::error::Result;
use crate::value::{DynamicObject, ObjectRef, Value};

/// Generic fallback accessor over the property map of a [`DynamicObject`].
#[derive(Debug, Clone)]
pub struct DynamicAccessor {
    declaring_type: Arc<str>,
    name: Arc<str>,
}

impl DynamicAccessor {
    pub fn new(declaring_type: Arc<str>, name: Arc<str>) -> Self {
        Self {
            declaring_type,
            name,
        }
    }
}

impl PropertyAccessor for DynamicAccessor {
    fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    fn property_name(&self) -> &str {
        &self.name
    }

    fn read(&self, target: &ObjectRef) -> Result<Value> {
        target
            .read(|o: &DynamicObject| o.get(&self.name).cloned().unwrap_or(Value::Null))
            .ok_or_else(|| wrong_target(&self.declaring_type, target))
    }

    fn write(&self, target: &ObjectRef, value: Value) -> Result<()> {
        target
            .write(|o: &mut DynamicObject| {
                o.set(&*self.name, value);
            })
            .ok_or_else(|| wrong_target(&self.declaring_type, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reads_null() {
        let obj = DynamicObject::new("acme.Point").into_object();
        let acc = DynamicAccessor::new("acme.Point".into(), "x".into());
        assert_eq!(acc.read(&obj).expect("read"), Value::Null);
        acc.write_int(&obj, 4).expect("write");
        assert_eq!(acc.read_int(&obj).expect("read int"), 4);
    }
}
