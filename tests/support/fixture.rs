//! Reusable scenarios run against every store flavour holding [`Dummy`] records.

use persist_rust::{FieldMap, MemoryPersistence, PagingParams};
use serde_json::json;

use super::dummy::{key_length_less, Dummy, DummyFilter};

const CID: &str = "123";

fn dummy1() -> Dummy {
    Dummy::new("Key 11", "Content 1")
}

fn dummy2() -> Dummy {
    Dummy::new("Key 2", "Content 2")
}

pub fn crud_operations(persistence: &MemoryPersistence<Dummy>) {
    let mut created1 = persistence.create(CID, &dummy1()).unwrap();
    assert!(!created1.id.is_empty());
    assert_eq!(created1.key, "Key 11");
    assert_eq!(created1.content, "Content 1");

    let created2 = persistence.create(CID, &dummy2()).unwrap();
    assert!(!created2.id.is_empty());
    assert_ne!(created1.id, created2.id);

    let page = persistence
        .get_page_by_filter(CID, None, None, None, None)
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.total, None);

    let page = persistence
        .get_page_by_filter(
            CID,
            None,
            Some(PagingParams::new(Some(10), Some(1), false)),
            None,
            None,
        )
        .unwrap();
    assert!(page.is_empty());

    assert_eq!(persistence.get_count_by_filter(CID, None).unwrap(), 2);

    // Update
    created1.content = "Updated Content 1".into();
    let updated = persistence.update(CID, &created1).unwrap().unwrap();
    assert_eq!(updated, created1);

    // Partial update
    let mut fields = FieldMap::new();
    fields.insert("Content".into(), json!("Partially Updated Content 1"));
    let updated = persistence
        .update_partially(CID, &created1.id, &fields)
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created1.id);
    assert_eq!(updated.key, created1.key);
    assert_eq!(updated.content, "Partially Updated Content 1");

    let fetched = persistence.get_one_by_id(CID, &created1.id).unwrap().unwrap();
    assert_eq!(fetched, updated);

    // Delete
    let deleted = persistence.delete_by_id(CID, &created1.id).unwrap().unwrap();
    assert_eq!(deleted, updated);
    assert_eq!(persistence.get_one_by_id(CID, &created1.id).unwrap(), None);

    assert!(persistence.delete_by_id(CID, &created2.id).unwrap().is_some());
    assert_eq!(persistence.get_count_by_filter(CID, None).unwrap(), 0);
}

pub fn batch_operations(persistence: &MemoryPersistence<Dummy>) {
    let created1 = persistence.create(CID, &dummy1()).unwrap();
    let created2 = persistence.create(CID, &dummy2()).unwrap();
    let ids = vec![created1.id.clone(), created2.id.clone()];

    let items = persistence.get_list_by_ids(CID, &ids).unwrap();
    assert_eq!(items, vec![created1, created2]);

    persistence.delete_by_ids(CID, &ids).unwrap();

    let items = persistence.get_list_by_ids(CID, &ids).unwrap();
    assert!(items.is_empty());
}

pub fn filter_operations(persistence: &MemoryPersistence<Dummy>) {
    for i in 0..200 {
        let dummy = Dummy::new(format!("Key {}", i), format!("Content {}", i));
        let created = persistence.create(CID, &dummy).unwrap();
        assert_eq!(created.key, dummy.key);
    }

    assert_eq!(persistence.get_count_by_filter(CID, None).unwrap(), 200);

    let page = persistence
        .get_page_by_filter(
            CID,
            None,
            Some(PagingParams::new(Some(10), Some(1), true)),
            None,
            None,
        )
        .unwrap();
    assert_eq!(page.total, Some(200));
    assert_eq!(page.len(), 1);
    assert_eq!(page.data[0].key, "Key 10");
    assert_eq!(page.data[0].content, "Content 10");

    let page = persistence
        .get_page_by_filter(
            CID,
            None,
            Some(PagingParams::new(Some(100), Some(50), true)),
            None,
            None,
        )
        .unwrap();
    assert_eq!(page.total, Some(200));
    assert_eq!(page.len(), 50);
    assert_eq!(page.data[0].key, "Key 100");

    // Default take is capped at the max page size
    let page = persistence
        .get_page_by_filter(CID, None, None, None, None)
        .unwrap();
    assert_eq!(page.len(), persistence.max_page_size());

    let filter = DummyFilter::by_key("Key 42");
    let matches = |d: &Dummy| filter.matches(d);
    let page = persistence
        .get_page_by_filter(
            CID,
            Some(&matches),
            Some(PagingParams::new(None, None, true)),
            None,
            None,
        )
        .unwrap();
    assert_eq!(page.total, Some(1));
    assert_eq!(page.data[0].content, "Content 42");
    assert_eq!(persistence.get_count_by_filter(CID, Some(&matches)).unwrap(), 1);

    let nothing = DummyFilter::by_key("Key 999");
    let page = persistence
        .get_page_by_filter(
            CID,
            Some(&|d: &Dummy| nothing.matches(d)),
            Some(PagingParams::new(None, None, true)),
            None,
            None,
        )
        .unwrap();
    assert_eq!(page.total, Some(0));
    assert!(page.is_empty());
}

pub fn sorted_queries(persistence: &MemoryPersistence<Dummy>) {
    persistence.create(CID, &dummy1()).unwrap();
    persistence.create(CID, &dummy2()).unwrap();

    let page = persistence
        .get_page_by_filter(CID, None, None, Some(&key_length_less), None)
        .unwrap();
    let keys: Vec<_> = page.data.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["Key 2", "Key 11"]);

    let keys_only = |d: Dummy| Dummy {
        content: String::new(),
        ..d
    };
    let list = persistence
        .get_list_by_filter(CID, None, Some(&key_length_less), Some(&keys_only))
        .unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].key, "Key 2");
    assert!(list.iter().all(|d| d.content.is_empty()));
}

pub fn copy_isolation(persistence: &MemoryPersistence<Dummy>) {
    let mut input = dummy1();
    let created = persistence.create(CID, &input).unwrap();

    // Mutating the caller's value or a returned value never reaches the store
    input.content = "changed input".into();
    let mut fetched = persistence.get_one_by_id(CID, &created.id).unwrap().unwrap();
    fetched.content = "changed output".into();

    let stored = persistence.get_one_by_id(CID, &created.id).unwrap().unwrap();
    assert_eq!(stored.content, "Content 1");
    assert!(input.id.is_empty());
}
