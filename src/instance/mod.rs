//! Validated record instances.
//!
//! An instance is created only by validation and offers read access plus
//! serialization; there is no mutation API. Serialization reproduces
//! declared field order, keyed by canonical names or aliases per caller
//! request, with computed fields appended.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::schema::RecordType;
use crate::validate::ValueMap;

/// A validated, immutable value conforming to a record type
#[derive(Debug, Clone)]
pub struct Instance {
    record: RecordType,
    values: ValueMap,
    fields_set: BTreeSet<String>,
}

impl Instance {
    /// Created only by validation.
    pub(crate) fn new(record: RecordType, values: ValueMap, fields_set: BTreeSet<String>) -> Self {
        Self {
            record,
            values,
            fields_set,
        }
    }

    /// The record type this instance conforms to
    pub fn record(&self) -> &RecordType {
        &self.record
    }

    /// Reads one field's validated value by canonical name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Names of the fields the caller explicitly supplied, as opposed to
    /// defaulted
    pub fn fields_set(&self) -> &BTreeSet<String> {
        &self.fields_set
    }

    /// Whether the named field was explicitly supplied
    pub fn was_supplied(&self, name: &str) -> bool {
        self.fields_set.contains(name)
    }

    /// Serializes to an ordered mapping in declared field order.
    ///
    /// Keys are canonical names, or aliases when `by_alias` is set and the
    /// field declares one. Computed fields follow the declared fields in
    /// their own declaration order.
    pub fn serialize(&self, by_alias: bool) -> ValueMap {
        let mut out = ValueMap::new();

        for field in &self.record.fields {
            let key = if by_alias {
                field.lookup_key()
            } else {
                field.name.as_str()
            };
            let value = self.values.get(&field.name).cloned().unwrap_or(Value::Null);
            out.insert(key.to_string(), value);
        }

        for computed in self.record.computed_fields() {
            out.insert(
                computed.name().to_string(),
                computed.compute(&self.values),
            );
        }

        out
    }

    /// Serializes to a JSON string, same shape as [`serialize`](Self::serialize)
    pub fn serialize_json(&self, by_alias: bool) -> serde_json::Result<String> {
        serde_json::to_string(&Value::Object(self.serialize(by_alias)))
    }
}
