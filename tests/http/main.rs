//! HTTP transport integration tests.
//!
//! Starts an axum server that speaks the collection envelope format and
//! drives it through `HttpTransport`.
#![cfg(feature = "http")]


use data_connector::{HttpTransport, Model, Store, StoreError, TransportError};
use serde_json::json;

async fn connected_store() -> (Store, server::Db) {
    let (origin, db) = server::start().await;
    let store = Store::builder()
        .transport(HttpTransport::new().with_origin(origin))
        .build();
    (store, db)
}

#[tokio::test]
async fn create_then_fetch_all() {
    let (store, _db) = connected_store().await;
    let cats = store.register_collection("cats", Model::new()).unwrap();

    let created = cats.create(json!({ "name": "Felix" })).await.unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(
        cats.find(1).unwrap().unwrap().get("name").unwrap(),
        Some(json!("Felix"))
    );

    cats.create(json!({ "name": "Silvestor" })).await.unwrap();
    let fetched = cats.fetch_all().await.unwrap();

    assert_eq!(fetched.len(), 2);
    assert_eq!(cats.len().unwrap(), 2);
}

#[tokio::test]
async fn fetch_single_item() {
    let (store, db) = connected_store().await;
    server::seed(&db, json!({ "id": 5, "name": "Tom" }));
    let cats = store.register_collection("cats", Model::new()).unwrap();

    cats.fetch(5).await.unwrap();

    assert_eq!(
        cats.find(5).unwrap().unwrap().get("name").unwrap(),
        Some(json!("Tom"))
    );
}

#[tokio::test]
async fn update_round_trips_through_the_server() {
    let (store, db) = connected_store().await;
    server::seed(&db, json!({ "id": 1, "name": "Felix", "legs": 4 }));
    let cats = store.register_collection("cats", Model::new()).unwrap();
    cats.fetch_all().await.unwrap();
    let felix = cats.find(1).unwrap().unwrap();

    felix
        .update(&store, json!({ "name": "Felix II" }))
        .await
        .unwrap();

    assert_eq!(felix.get("name").unwrap(), Some(json!("Felix II")));
    assert_eq!(felix.get("legs").unwrap(), Some(json!(4)));
    assert_eq!(server::get(&db, 1).unwrap()["name"], json!("Felix II"));
}

#[tokio::test]
async fn destroy_removes_on_both_sides() {
    let (store, db) = connected_store().await;
    server::seed(&db, json!({ "id": 1, "name": "Felix" }));
    let cats = store.register_collection("cats", Model::new()).unwrap();
    cats.fetch_all().await.unwrap();

    let felix = cats.find(1).unwrap().unwrap();
    let body = felix.destroy(&store).await.unwrap();

    assert_eq!(body, json!({ "cats": [{ "id": 1, "name": "Felix" }] }));
    assert!(cats.find(1).unwrap().is_none());
    assert!(server::get(&db, 1).is_none());
}

#[tokio::test]
async fn missing_item_surfaces_404() {
    let (store, _db) = connected_store().await;
    let cats = store.register_collection("cats", Model::new()).unwrap();

    let err = cats.fetch(42).await.unwrap_err();

    assert!(matches!(
        err,
        StoreError::Transport(TransportError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let store = Store::builder()
        .transport(HttpTransport::new().with_origin("http://127.0.0.1:9"))
        .build();
    let cats = store.register_collection("cats", Model::new()).unwrap();

    let err = cats.fetch_all().await.unwrap_err();

    assert!(matches!(
        err,
        StoreError::Transport(TransportError::Network(_))
    ));
}
