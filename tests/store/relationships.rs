use serde_json::json;

use crate::pets;

#[test]
fn has_many_returns_associated_items() {
    let (store, cats, dogs) = pets();
    cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();
    dogs.add(json!({ "id": 1, "name": "Fido", "cat_id": 1 })).unwrap();

    let felix = cats.find(1).unwrap().unwrap();
    let felix_dogs = felix.has_many(&store, "dogs").unwrap();

    assert_eq!(felix_dogs[0].get("name").unwrap(), Some(json!("Fido")));
    assert_eq!(
        felix_dogs.find(1).unwrap().unwrap().get("name").unwrap(),
        Some(json!("Fido"))
    );
}

#[test]
fn view_add_is_visible_in_the_collection() {
    let (store, cats, dogs) = pets();
    cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();
    dogs.add(json!({ "id": 1, "name": "Fido", "cat_id": 1 })).unwrap();

    let felix = cats.find(1).unwrap().unwrap();
    let mut view = felix.has_many(&store, "dogs").unwrap();
    let rover = view
        .add(json!({ "id": 2, "name": "Rover", "cat_id": 1 }))
        .unwrap();

    assert!(dogs.find(2).unwrap().unwrap().ptr_eq(&rover));
    assert_eq!(view.len(), 2);
    assert_eq!(
        felix
            .has_many(&store, "dogs")
            .unwrap()
            .find(2)
            .unwrap()
            .unwrap()
            .get("name")
            .unwrap(),
        Some(json!("Rover"))
    );
}

#[test]
fn view_remove_removes_from_the_collection() {
    let (store, cats, dogs) = pets();
    cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();
    dogs.add(json!({ "id": 1, "name": "Fido", "cat_id": 1 })).unwrap();

    let felix = cats.find(1).unwrap().unwrap();
    let mut view = felix.has_many(&store, "dogs").unwrap();

    assert_eq!(view.remove(1).unwrap(), 1);
    assert!(view.is_empty());
    assert!(dogs.find(1).unwrap().is_none());
    assert!(felix.has_many(&store, "dogs").unwrap().find(1).unwrap().is_none());
}

#[test]
fn relationships_are_recomputed_on_every_access() {
    let (store, cats, dogs) = pets();
    let felix = cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();
    dogs.add(json!({ "id": 1, "name": "Fido", "cat_id": 1 })).unwrap();

    let before = felix.has_many(&store, "dogs").unwrap();
    dogs.add(json!({ "id": 2, "name": "Rover", "cat_id": 1 })).unwrap();
    let after = felix.has_many(&store, "dogs").unwrap();

    assert_eq!(before.len(), 1);
    assert_eq!(after.len(), 2);
    assert_eq!(after[1].get("name").unwrap(), Some(json!("Rover")));
}

#[test]
fn foreign_key_changes_move_items_between_owners() {
    let (store, cats, dogs) = pets();
    let felix = cats.add(json!({ "id": 1 })).unwrap();
    let tom = cats.add(json!({ "id": 2 })).unwrap();
    dogs.add(json!({ "id": 1, "cat_id": 1 })).unwrap();

    dogs.add(json!({ "id": 1, "cat_id": 2 })).unwrap();

    assert!(felix.has_many(&store, "dogs").unwrap().is_empty());
    assert_eq!(tom.has_many(&store, "dogs").unwrap().len(), 1);
}

#[test]
fn has_one_returns_the_first_match() {
    let (store, cats, dogs) = pets();
    cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();
    dogs.add(json!({ "id": 1, "name": "Fido", "cat_id": 1 })).unwrap();
    dogs.add(json!({ "id": 2, "name": "Rover", "cat_id": 1 })).unwrap();

    let dog = cats
        .find(1)
        .unwrap()
        .unwrap()
        .has_one(&store, "dog")
        .unwrap()
        .unwrap();
    assert_eq!(dog.get("name").unwrap(), Some(json!("Fido")));
}

#[test]
fn has_one_without_match_is_none() {
    let (store, cats, _dogs) = pets();
    let felix = cats.add(json!({ "id": 1 })).unwrap();

    assert!(felix.has_one(&store, "dog").unwrap().is_none());
}

#[test]
fn strict_equality_between_id_and_foreign_key() {
    let (store, cats, dogs) = pets();
    let felix = cats.add(json!({ "id": 1 })).unwrap();
    dogs.add(json!({ "id": 1, "cat_id": "1" })).unwrap();

    assert!(felix.has_many(&store, "dogs").unwrap().is_empty());
}

#[test]
fn integral_float_foreign_key_matches_integer_id() {
    let (store, cats, dogs) = pets();
    let felix = cats.add(json!({ "id": 1 })).unwrap();
    let fido = dogs.add(json!({ "id": 1, "cat_id": 1.0 })).unwrap();

    let felix_dogs = felix.has_many(&store, "dogs").unwrap();
    assert_eq!(felix_dogs.len(), 1);
    assert!(felix_dogs[0].ptr_eq(&fido));
}
