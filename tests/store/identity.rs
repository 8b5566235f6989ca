use data_connector::{Model, Store, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[test]
fn add_lands_in_the_registered_collection() {
    let store = Store::new();
    let cats = store.register_collection("cats", Model::new()).unwrap();

    cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();

    assert_eq!(store.dump().unwrap()["cats"].len().unwrap(), 1);
}

#[test]
fn repeated_add_returns_the_same_item() {
    let store = Store::new();
    let cats = store.register_collection("cats", Model::new()).unwrap();

    let first = cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();
    let second = cats
        .add(json!({ "id": 1, "name": "Felix", "legs": 4 }))
        .unwrap();

    assert!(first.ptr_eq(&second));
    assert_eq!(first.get("name").unwrap(), Some(json!("Felix")));
    assert_eq!(first.get("legs").unwrap(), Some(json!(4)));
}

#[test]
fn partial_content_keeps_untouched_fields() {
    let store = Store::new();
    let cats = store.register_collection("cats", Model::new()).unwrap();

    let held = cats
        .add(json!({ "id": 1, "name": "Felix", "color": "black" }))
        .unwrap();
    cats.add(json!({ "id": 1, "color": "grey", "age": 3 })).unwrap();

    assert_eq!(
        serde_json::Value::Object(held.attributes().unwrap()),
        json!({ "id": 1, "name": "Felix", "color": "grey", "age": 3 })
    );
}

#[test]
fn all_and_find_see_insertion_order() {
    let store = Store::new();
    let cats = store.register_collection("cats", Model::new()).unwrap();
    cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();
    cats.add(json!({ "id": 2, "name": "Silvestor" })).unwrap();
    cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();

    let all = cats.all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].get("name").unwrap(), Some(json!("Felix")));
    assert_eq!(all[1].get("name").unwrap(), Some(json!("Silvestor")));
    assert_eq!(
        cats.find(2).unwrap().unwrap().get("name").unwrap(),
        Some(json!("Silvestor"))
    );
}

#[test]
fn remove_then_find_is_none() {
    let store = Store::new();
    let cats = store.register_collection("cats", Model::new()).unwrap();
    cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();

    assert_eq!(cats.remove(1).unwrap(), 1);
    assert!(cats.find(1).unwrap().is_none());
}

#[test]
fn remove_unknown_id_is_a_no_op() {
    let store = Store::new();
    let cats = store.register_collection("cats", Model::new()).unwrap();
    cats.add(json!({ "id": 1 })).unwrap();
    cats.add(json!({ "id": 2 })).unwrap();

    assert_eq!(cats.remove(3).unwrap(), 0);
    assert_eq!(cats.len().unwrap(), 2);
    assert!(cats.find(2).unwrap().is_some());
}

#[test]
fn typed_content_round_trips_through_add_from() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Cat {
        id: u32,
        name: String,
    }

    let store = Store::new();
    let cats = store.register_collection("cats", Model::new()).unwrap();
    let felix = Cat {
        id: 1,
        name: "Felix".into(),
    };

    let item = cats.add_from(&felix).unwrap();
    assert_eq!(item.decode::<Cat>().unwrap(), felix);
}

#[test]
fn registering_twice_fails_fast() {
    let store = Store::new();
    store.register_collection("cats", Model::new()).unwrap();

    assert_eq!(
        store.register_collection("cats", Model::new()).unwrap_err(),
        StoreError::DuplicateCollection("cats".into())
    );
}
