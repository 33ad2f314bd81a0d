use parley_storage::{Criteria, DocumentStore, LibSqlStore, Query, StoreConfig, ID_FIELD};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn document(value: serde_json::Value) -> parley_storage::Document {
    value.as_object().cloned().expect("object literal")
}

#[tokio::test]
async fn documents_survive_reopening_a_local_store() {
    let td = TempDir::new().unwrap();
    let path = td.path().join("nested").join("parley.db");

    let id = {
        let store = LibSqlStore::open_local("local", &path).await.unwrap();
        store
            .insert(
                "messages",
                document(json!({"recipient_id": "bob", "content": "persisted"})),
            )
            .await
            .unwrap()
    };
    assert!(path.exists(), "database file should have been created");

    let store = LibSqlStore::open_local("local", &path).await.unwrap();
    let found = store
        .find("messages", &Query::new(Criteria::new().eq("recipient_id", "bob")))
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0][ID_FIELD], json!(id));
    assert_eq!(found[0]["content"], "persisted");
}

#[tokio::test]
async fn open_from_config_applies_path_and_timeout() {
    let td = TempDir::new().unwrap();
    let config = StoreConfig {
        timeout_secs: Some(5),
        ..StoreConfig::local(td.path().join("parley.db"))
    };

    let store = LibSqlStore::open("configured", &config).await.unwrap();
    assert_eq!(store.name(), "configured");
    assert!(store.health_check().await);

    store
        .insert("messages", document(json!({"content": "hello"})))
        .await
        .unwrap();
    let all = store.find("messages", &Query::default()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn collections_are_isolated() {
    let store = LibSqlStore::in_memory("isolation").await.unwrap();
    store
        .insert("messages", document(json!({"content": "a"})))
        .await
        .unwrap();
    store
        .insert("drafts", document(json!({"content": "b"})))
        .await
        .unwrap();

    let messages = store.find("messages", &Query::default()).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "a");
}

#[tokio::test]
async fn invalid_collection_name_is_rejected() {
    let store = LibSqlStore::in_memory("names").await.unwrap();
    let err = store
        .insert("messages\"; DROP TABLE x; --", document(json!({})))
        .await
        .unwrap_err();
    assert!(err.is_rejected());
}

#[tokio::test]
async fn generous_timeout_does_not_interfere() {
    let store = LibSqlStore::in_memory("timeout")
        .await
        .unwrap()
        .with_timeout(Duration::from_secs(30));

    for i in 0..10 {
        store
            .insert("messages", document(json!({"seq": i})))
            .await
            .unwrap();
    }
    let capped = store
        .find("messages", &Query::default().with_limit(3))
        .await
        .unwrap();
    assert_eq!(capped.len(), 3);
}
