//! Record value operations: set, add, get, unset, and entry listing,
//! including records attached directly to the root.

mod common;

use common::store;
use scopestore::{EntryType, StoreError};

#[tokio::test]
async fn set_and_get_round_trip() {
    let store = store();
    store.root().create_scope("app").await.unwrap();
    store.within("app").set_value("owner", "ops").await.unwrap();

    let value = store.within("app").get_value("owner").await.unwrap();
    assert_eq!(value.as_deref(), Some("ops"));
}

#[tokio::test]
async fn root_carries_records_without_any_scope() {
    let store = store();
    store.root().set_value("version", "7").await.unwrap();

    assert_eq!(
        store.root().get_value("version").await.unwrap().as_deref(),
        Some("7")
    );
    // One record row, no identity rows.
    assert_eq!(store.backend().row_count(), 1);
}

#[tokio::test]
async fn add_accumulates_values_in_insertion_order() {
    let store = store();
    store.root().create_scope("app").await.unwrap();
    store.within("app").add_value("tag", "alpha").await.unwrap();
    store.within("app").add_value("tag", "beta").await.unwrap();
    store.within("app").add_value("tag", "gamma").await.unwrap();

    let values = store.within("app").get_values("tag").await.unwrap();
    assert_eq!(values, vec!["alpha", "beta", "gamma"]);
    // get_value picks the first inserted.
    assert_eq!(
        store.within("app").get_value("tag").await.unwrap().as_deref(),
        Some("alpha")
    );
}

#[tokio::test]
async fn set_replaces_every_accumulated_value() {
    let store = store();
    store.root().create_scope("app").await.unwrap();
    store.within("app").add_value("tag", "alpha").await.unwrap();
    store.within("app").add_value("tag", "beta").await.unwrap();

    store.within("app").set_value("tag", "only").await.unwrap();
    let values = store.within("app").get_values("tag").await.unwrap();
    assert_eq!(values, vec!["only"]);
}

#[tokio::test]
async fn unset_reports_removed_rows_and_clears_the_key() {
    let store = store();
    store.root().create_scope("app").await.unwrap();
    store.within("app").add_value("tag", "alpha").await.unwrap();
    store.within("app").add_value("tag", "beta").await.unwrap();
    store.within("app").set_value("other", "x").await.unwrap();

    let removed = store.within("app").unset_value("tag").await.unwrap();
    assert_eq!(removed, 2);
    assert!(store.within("app").get_values("tag").await.unwrap().is_empty());
    // Unrelated keys survive.
    assert_eq!(
        store.within("app").get_value("other").await.unwrap().as_deref(),
        Some("x")
    );

    let removed = store.within("app").unset_value("tag").await.unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn missing_key_reads_as_none_and_empty() {
    let store = store();
    store.root().create_scope("app").await.unwrap();

    assert!(store.within("app").get_value("nope").await.unwrap().is_none());
    assert!(store.within("app").get_values("nope").await.unwrap().is_empty());
}

#[tokio::test]
async fn entries_lists_user_records_but_not_child_scopes() {
    let store = store();
    store.root().create_scope("app").await.unwrap();
    store.within("app").create_scope("child").await.unwrap();
    store.within("app").set_value("owner", "ops").await.unwrap();
    store.within("app").add_value("tag", "alpha").await.unwrap();

    let entries = store.within("app").entries().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.entry_type == EntryType::Value));
    let keys: Vec<&str> = entries.iter().map(|e| e.entry_key.as_str()).collect();
    assert_eq!(keys, vec!["owner", "tag"]);
}

#[tokio::test]
async fn same_key_is_isolated_between_scopes() {
    let store = store();
    store.root().create_scope("a").await.unwrap();
    store.root().create_scope("b").await.unwrap();
    store.within("a").set_value("color", "red").await.unwrap();
    store.within("b").set_value("color", "blue").await.unwrap();
    store.root().set_value("color", "green").await.unwrap();

    assert_eq!(
        store.within("a").get_value("color").await.unwrap().as_deref(),
        Some("red")
    );
    assert_eq!(
        store.within("b").get_value("color").await.unwrap().as_deref(),
        Some("blue")
    );
    assert_eq!(
        store.root().get_value("color").await.unwrap().as_deref(),
        Some("green")
    );
}

#[tokio::test]
async fn value_operations_fail_on_missing_paths() {
    let store = store();

    let result = store.within("ghost").set_value("k", "v").await;
    assert!(matches!(result, Err(StoreError::MissingScope { .. })));
    let result = store.within("ghost").get_value("k").await;
    assert!(matches!(result, Err(StoreError::MissingScope { .. })));
    assert_eq!(store.backend().row_count(), 0);
}
