//! Scenarios for map-shaped records stored as [`AnyMap`].

use persist_rust::{AnyMap, FieldMap, MemoryPersistence};
use serde_json::{json, Value};

use super::dummy_map::{dummy_map, field, key_length_less};

const CID: &str = "123";

fn id_of(map: &AnyMap) -> Value {
    field(map, "Id").clone()
}

pub fn crud_operations(persistence: &MemoryPersistence<AnyMap>) {
    let mut created1 = persistence
        .create(CID, &dummy_map("Key 11", "Content 1"))
        .unwrap();
    assert!(id_of(&created1).as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(field(&created1, "Key"), "Key 11");
    // The generated id lands on the existing "Id" key
    assert!(!created1.contains_key("id"));

    let created2 = persistence
        .create(CID, &dummy_map("Key 2", "Content 2"))
        .unwrap();

    let page = persistence
        .get_page_by_filter(CID, None, None, Some(&key_length_less), None)
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(field(&page.data[0], "Key"), field(&created2, "Key"));
    assert_eq!(field(&page.data[1], "Key"), field(&created1, "Key"));

    created1.insert("Content".into(), json!("Updated Content 1"));
    let updated = persistence.update(CID, &created1).unwrap().unwrap();
    assert_eq!(field(&updated, "Content"), "Updated Content 1");

    let mut fields = FieldMap::new();
    fields.insert("Content".into(), json!("Partially Updated Content 1"));
    let updated = persistence
        .update_partially(CID, &id_of(&created1), &fields)
        .unwrap()
        .unwrap();
    assert_eq!(id_of(&updated), id_of(&created1));
    assert_eq!(field(&updated, "Key"), "Key 11");
    assert_eq!(field(&updated, "Content"), "Partially Updated Content 1");

    let fetched = persistence
        .get_one_by_id(CID, &id_of(&created1))
        .unwrap()
        .unwrap();
    assert_eq!(fetched, updated);

    let deleted = persistence
        .delete_by_id(CID, &id_of(&created1))
        .unwrap()
        .unwrap();
    assert_eq!(deleted, updated);
    assert_eq!(persistence.get_one_by_id(CID, &id_of(&created1)).unwrap(), None);
}

pub fn batch_operations(persistence: &MemoryPersistence<AnyMap>) {
    let created1 = persistence
        .create(CID, &dummy_map("Key 11", "Content 1"))
        .unwrap();
    let created2 = persistence
        .create(CID, &dummy_map("Key 2", "Content 2"))
        .unwrap();
    let ids = vec![id_of(&created1), id_of(&created2)];

    assert_eq!(persistence.get_list_by_ids(CID, &ids).unwrap().len(), 2);

    persistence.delete_by_ids(CID, &ids).unwrap();
    assert!(persistence.get_list_by_ids(CID, &ids).unwrap().is_empty());
}
