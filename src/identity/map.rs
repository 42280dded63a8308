use serde_json::Value;

use super::{FieldMap, Identifiable, ID_FIELD};
use crate::Result;

/// Map-shaped record: an ordered set of named JSON values.
pub type AnyMap = serde_json::Map<String, Value>;

/// Looks up a property by name, ignoring ASCII case.
pub fn get_property<'a>(map: &'a AnyMap, name: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// Overwrites the property matching `name` (ignoring ASCII case), or inserts
/// it under `name` when no key matches.
pub fn set_property(map: &mut AnyMap, name: &str, value: Value) {
    let existing = map.keys().find(|key| key.eq_ignore_ascii_case(name)).cloned();
    map.insert(existing.unwrap_or_else(|| name.to_string()), value);
}

impl Identifiable for AnyMap {
    type Key = Value;

    fn id(&self) -> Option<Value> {
        get_property(self, ID_FIELD).cloned()
    }

    fn set_id(&mut self, id: Value) {
        set_property(self, ID_FIELD, id);
    }

    fn apply_fields(&mut self, fields: &FieldMap) -> Result<()> {
        for (name, value) in fields {
            set_property(self, name, value.clone());
        }
        Ok(())
    }
}
