//! End-to-end coverage of the try-semantics layer against the
//! in-memory reference store.

use doctry_client::{
    ClientError, CollectionLink, Document, Etag, StatusCode, StoreError, TryOutcome, TryStore,
};
use doctry_testkit::{numbered_documents, user_document, InMemoryStore};
use serde_json::json;

fn orders() -> CollectionLink {
    CollectionLink::new("shop", "orders")
}

#[tokio::test]
async fn read_missing_returns_not_found_without_error() {
    let store = TryStore::new(InMemoryStore::new());
    let outcome = store.try_read(&orders().document("ghost")).await.unwrap();
    assert_eq!(outcome, TryOutcome::NotFound);
}

#[tokio::test]
async fn create_existing_returns_conflict_and_leaves_store_unchanged() {
    let store = TryStore::new(InMemoryStore::new());
    store
        .try_create(&orders(), user_document("u1", "Alice", 30))
        .await
        .unwrap()
        .found()
        .expect("first create succeeds");

    let outcome = store
        .try_create(&orders(), user_document("u1", "Mallory", 99))
        .await
        .unwrap();
    assert_eq!(outcome, TryOutcome::Conflict);

    let kept = store
        .try_read(&orders().document("u1"))
        .await
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(kept.body()["name"], "Alice");
}

#[tokio::test]
async fn delete_and_replace_missing_return_not_found() {
    let store = TryStore::new(InMemoryStore::new());

    let deleted = store.try_delete(&orders().document("ghost")).await.unwrap();
    assert_eq!(deleted, TryOutcome::NotFound);

    let replaced = store
        .try_replace(&orders().document("ghost"), Document::new("ghost", json!({})))
        .await
        .unwrap();
    assert_eq!(replaced, TryOutcome::NotFound);
}

#[tokio::test]
async fn delete_existing_removes_the_document() {
    let store = TryStore::new(InMemoryStore::new());
    store
        .try_create(&orders(), user_document("u1", "Alice", 30))
        .await
        .unwrap();

    let deleted = store.try_delete(&orders().document("u1")).await.unwrap();
    assert_eq!(deleted, TryOutcome::Found(()));
    assert!(!store.store().contains(&orders().document("u1")));
}

#[tokio::test]
async fn lock_replace_with_current_token_succeeds_and_rotates_etag() {
    let store = TryStore::new(InMemoryStore::new());
    let created = store
        .try_create(&orders(), user_document("u1", "Alice", 30))
        .await
        .unwrap()
        .found()
        .unwrap();
    let token = created.etag().cloned().unwrap();

    let updated = store
        .replace_with_lock(&created, &token)
        .await
        .unwrap()
        .found()
        .expect("matching token succeeds");

    assert_ne!(updated.etag(), Some(&token));
}

#[tokio::test]
async fn stale_token_scenario_surfaces_typed_conflict() {
    // Document "X" with stored eTag v1: the first caller replaces with
    // the current token and wins; a second caller retrying with the
    // stale token gets the typed conflict.
    let store = TryStore::new(InMemoryStore::new());
    let created = store
        .try_create(&orders(), Document::new("X", json!({"state": "draft"})))
        .await
        .unwrap()
        .found()
        .unwrap();
    let v1 = created.etag().cloned().unwrap();

    store
        .replace_with_lock(&created, &v1)
        .await
        .unwrap()
        .found()
        .expect("first writer wins");

    let err = store
        .replace_with_lock(&created, &v1)
        .await
        .expect_err("second writer must conflict");

    let conflict = match err {
        ClientError::LockConflict(conflict) => conflict,
        other => panic!("expected a lock conflict, got {other}"),
    };
    // The error records the supplied token, not the stored one.
    assert_eq!(conflict.expected_etag(), &v1);
    assert_eq!(conflict.link(), &orders().document("X"));
    assert!(conflict.document().is_some());
    assert!(conflict.payload().is_none());
}

#[tokio::test]
async fn lock_replace_by_link_carries_raw_payload_in_conflict() {
    let store = TryStore::new(InMemoryStore::new());
    store
        .try_create(&orders(), Document::new("X", json!({"n": 1})))
        .await
        .unwrap();

    let payload = json!({"n": 2});
    let err = store
        .replace_with_lock_at(&orders().document("X"), payload.clone(), &Etag::new("stale"))
        .await
        .expect_err("stale token must conflict");

    let conflict = match err {
        ClientError::LockConflict(conflict) => conflict,
        other => panic!("expected a lock conflict, got {other}"),
    };
    assert_eq!(conflict.payload(), Some(&payload));
    assert!(conflict.document().is_none());
    assert_eq!(conflict.expected_etag().as_str(), "stale");
}

#[tokio::test]
async fn lock_replace_on_missing_document_is_still_not_found() {
    let store = TryStore::new(InMemoryStore::new());
    let outcome = store
        .replace_with_lock_at(&orders().document("ghost"), json!({}), &Etag::new("v1"))
        .await
        .unwrap();
    assert_eq!(outcome, TryOutcome::NotFound);
}

#[tokio::test]
async fn upsert_creates_then_overwrites() {
    let store = TryStore::new(InMemoryStore::new());

    let first = store
        .upsert(&orders(), Document::new("u1", json!({"rev": 1})))
        .await
        .unwrap();
    assert_eq!(first.body()["rev"], 1);

    let second = store
        .upsert(&orders(), Document::new("u1", json!({"rev": 2})))
        .await
        .unwrap();
    assert_eq!(second.body()["rev"], 2);
    assert_ne!(first.etag(), second.etag());
    assert_eq!(store.store().len(), 1);
}

#[tokio::test]
async fn upsert_each_is_sequential_and_order_preserving() {
    let store = TryStore::new(InMemoryStore::new());
    let inputs = numbered_documents(5);

    let responses = store.upsert_each(&orders(), inputs).await.unwrap();

    assert_eq!(responses.len(), 5);
    for (n, response) in responses.iter().enumerate() {
        assert_eq!(response.id(), Some(n.to_string().as_str()));
    }

    // Exactly one store call per input, in order, none concurrent.
    let calls = store.store().calls();
    assert_eq!(calls.len(), 5);
    assert!(calls.iter().all(|call| call.starts_with("upsert ")));
}

#[tokio::test]
async fn upsert_each_aborts_on_first_failure() {
    let store = TryStore::new(InMemoryStore::new());
    store
        .store()
        .inject_error(StoreError::new(StatusCode::new(503), "unavailable"));

    let err = store
        .upsert_each(&orders(), numbered_documents(3))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Store(_)));
    // The failing call was the only one made.
    assert_eq!(store.store().call_count(), 1);
}

#[tokio::test]
async fn unexpected_store_errors_pass_through_unchanged() {
    let store = TryStore::new(InMemoryStore::new());

    store
        .store()
        .inject_error(StoreError::new(StatusCode::new(503), "read unavailable"));
    let err = store
        .try_read(&orders().document("u1"))
        .await
        .unwrap_err();
    let err = match err {
        ClientError::Store(err) => err,
        other => panic!("expected pass-through, got {other}"),
    };
    assert_eq!(err.status().as_u16(), 503);
    assert_eq!(err.message(), "read unavailable");

    store
        .store()
        .inject_error(StoreError::new(StatusCode::INTERNAL_SERVER_ERROR, "boom"));
    let err = store
        .try_create(&orders(), user_document("u1", "Alice", 30))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Store(_)));

    store
        .store()
        .inject_error(StoreError::new(StatusCode::new(429), "throttled"));
    let err = store.try_delete(&orders().document("u1")).await.unwrap_err();
    let err = match err {
        ClientError::Store(err) => err,
        other => panic!("expected pass-through, got {other}"),
    };
    assert_eq!(err.status().as_u16(), 429);
}

#[tokio::test]
async fn conflict_error_chains_to_the_store_error() {
    use std::error::Error as _;

    let store = TryStore::new(InMemoryStore::new());
    store
        .try_create(&orders(), Document::new("X", json!({})))
        .await
        .unwrap();

    let err = store
        .replace_with_lock_at(&orders().document("X"), json!({}), &Etag::new("stale"))
        .await
        .unwrap_err();

    let conflict = match err {
        ClientError::LockConflict(conflict) => conflict,
        other => panic!("expected a lock conflict, got {other}"),
    };
    let source = conflict.source().expect("store cause attached");
    assert!(source.to_string().contains("412"));
}
