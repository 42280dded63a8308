//! Record identity - locating, assigning and generating the unique key of a record.
//!
//! Records opt in by implementing [`Identifiable`], usually through the derive:
//!
//! ```ignore
//! use persist_rust::Identifiable;
//!
//! #[derive(Clone, Serialize, Deserialize, Identifiable)]
//! struct Dummy {
//!     pub id: String,
//!     pub key: String,
//!     pub content: String,
//! }
//! ```
//!
//! Map-shaped records use [`AnyMap`], whose identity is the `id` key matched
//! case-insensitively (`Id` and `ID` work too).

mod key;
mod map;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{PersistenceError, Result};

pub use key::IdentityKey;
pub use map::{get_property, set_property, AnyMap};

/// Name of the identity field on map-shaped records.
pub const ID_FIELD: &str = "id";

/// Field name to value map used for partial updates.
pub type FieldMap = serde_json::Map<String, Value>;

/// Trait for records that carry a unique identity.
///
/// `Clone` is the deep-copy capability: the store clones on every read and
/// write so callers never alias stored records.
pub trait Identifiable: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Key: IdentityKey;

    /// Returns the identity value, or `None` when the record has no identity field.
    fn id(&self) -> Option<Self::Key>;

    /// Assigns the identity value.
    fn set_id(&mut self, id: Self::Key);

    /// True when the identity field is present but holds its zero value.
    fn has_empty_id(&self) -> bool {
        self.id().is_some_and(|id| id.is_empty_key())
    }

    /// Merges `fields` into the record.
    ///
    /// The default goes through the serialized form: each name is matched
    /// against the serialized field names ignoring case and underscores, so
    /// `UpdatedBy`, `updatedby` and `updated_by` all address `updated_by`.
    /// Unknown names are skipped. A value of the wrong type is an error and
    /// leaves `self` untouched.
    fn apply_fields(&mut self, fields: &FieldMap) -> Result<()> {
        merge_serialized_fields(self, fields)
    }
}

/// Reads the identity of a record.
pub fn get_id<T: Identifiable>(item: &T) -> Option<T::Key> {
    item.id()
}

/// Returns a copy of `item` with its identity set to `id`.
pub fn set_id<T: Identifiable>(item: &T, id: T::Key) -> T {
    let mut copy = deep_copy(item);
    copy.set_id(id);
    copy
}

/// Assigns a freshly generated identity when the current one is empty.
///
/// Fails with [`PersistenceError::MissingId`] if the record has no identity
/// field at all.
pub fn generate_id_if_empty<T: Identifiable>(mut item: T) -> Result<T> {
    if item.has_empty_id() {
        item.set_id(T::Key::generate());
        return Ok(item);
    }

    match item.id() {
        Some(_) => Ok(item),
        None => Err(PersistenceError::MissingId),
    }
}

/// Produces a value-independent copy of a record.
pub fn deep_copy<T: Clone>(item: &T) -> T {
    item.clone()
}

pub(crate) fn has_id<T: Identifiable>(item: &T, id: &T::Key) -> bool {
    item.id().as_ref() == Some(id)
}

fn merge_serialized_fields<T: Identifiable>(item: &mut T, fields: &FieldMap) -> Result<()> {
    if fields.is_empty() {
        return Ok(());
    }

    let mut value = serde_json::to_value(&*item).map_err(|e| {
        PersistenceError::serialization("failed to serialize record for partial update", e)
    })?;
    let Value::Object(object) = &mut value else {
        return Ok(());
    };

    let mut changed = false;
    for (name, field_value) in fields {
        if let Some(key) = find_field(object, name) {
            object.insert(key, field_value.clone());
            changed = true;
        }
    }

    if changed {
        *item = serde_json::from_value(value).map_err(|e| {
            PersistenceError::serialization("failed to apply partial update to record", e)
        })?;
    }
    Ok(())
}

fn find_field(object: &FieldMap, name: &str) -> Option<String> {
    let wanted = normalize_field_name(name);
    object
        .keys()
        .find(|key| normalize_field_name(key) == wanted)
        .cloned()
}

fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
