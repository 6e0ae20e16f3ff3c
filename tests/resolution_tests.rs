//! Path resolution and scope creation integration tests.

mod common;

use common::{seed_numbered_tree, store};
use scopestore::{ScopeSelector, StoreError};

#[tokio::test]
async fn paths_resolve_segment_by_segment() {
    let store = store();
    store.root().create_scope("a").await.unwrap();
    store.within("a").create_scope("b").await.unwrap();
    store.within("a/b").create_scope("c").await.unwrap();

    let scopes = store.within("a/b").query_scopes().fetch().await.unwrap();
    assert_eq!(scopes.names(), vec!["c"]);
}

#[tokio::test]
async fn missing_segment_fails_with_the_full_requested_path() {
    let store = store();
    store.root().create_scope("scope1").await.unwrap();

    let result = store.within("scope1/ghost").query_scopes().fetch().await;
    match result {
        Err(StoreError::MissingScope { path }) => assert_eq!(path, "scope1/ghost"),
        other => panic!("expected MissingScope, got {other:?}"),
    }
}

#[tokio::test]
async fn resolution_is_deferred_until_execution() {
    let store = store();

    // Building an executor against an absent path is fine; only running
    // it trips the resolution failure.
    let pending = store.within("not/yet").query_scopes();
    store.root().create_scope("not").await.unwrap();
    store.within("not").create_scope("yet").await.unwrap();
    let scopes = pending.fetch().await.unwrap();
    assert!(scopes.is_empty());
}

#[tokio::test]
async fn empty_paths_and_stray_separators_mean_root() {
    let store = store();
    store.root().create_scope("x").await.unwrap();

    assert_eq!(store.within("").query_scopes().count().await.unwrap(), 1);
    assert_eq!(store.within("/").query_scopes().count().await.unwrap(), 1);
    assert_eq!(
        store.within("//x//").query_scopes().count().await.unwrap(),
        0
    );
    assert_eq!(store.within("x").selector(), &ScopeSelector::from_path("/x/"));
}

#[tokio::test]
async fn segment_selectors_bypass_separator_interpretation() {
    let store = store();
    store.root().create_scope("a").await.unwrap();
    store.within("a").create_scope("b").await.unwrap();

    let via_segments = store
        .within_segments(["a", "b"])
        .query_scopes()
        .count()
        .await
        .unwrap();
    assert_eq!(via_segments, 0);

    store.within_segments(["a", "b"]).create_scope("c").await.unwrap();
    assert_eq!(store.within("a/b").query_scopes().count().await.unwrap(), 1);
}

#[tokio::test]
async fn sibling_names_are_unique_but_cousins_may_share() {
    let store = store();
    store.root().create_scope("team").await.unwrap();
    let result = store.root().create_scope("team").await;
    assert!(matches!(result, Err(StoreError::DuplicateScope { .. })));

    // The same name under different parents is fine.
    store.within("team").create_scope("alpha").await.unwrap();
    store.root().create_scope("org").await.unwrap();
    store.within("org").create_scope("alpha").await.unwrap();

    assert_eq!(store.within("team/alpha").query_scopes().count().await.unwrap(), 0);
    assert_eq!(store.within("org/alpha").query_scopes().count().await.unwrap(), 0);
}

#[tokio::test]
async fn scope_names_are_validated_at_creation() {
    let store = store();
    let result = store.root().create_scope("").await;
    assert!(matches!(result, Err(StoreError::InvalidScopeName { .. })));

    let result = store.root().create_scope("a/b").await;
    assert!(matches!(result, Err(StoreError::InvalidScopeName { .. })));
}

#[tokio::test]
async fn ensure_scope_is_idempotent() {
    let store = store();
    let first = store.root().ensure_scope("cache").await.unwrap();
    let second = store.root().ensure_scope("cache").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(store.root().query_scopes().count().await.unwrap(), 1);
}

#[tokio::test]
async fn find_scope_returns_only_direct_children() {
    let store = store();
    seed_numbered_tree(&store).await.unwrap();

    let found = store.root().find_scope("1").await.unwrap();
    assert_eq!(found.map(|s| s.name), Some("1".to_string()));

    // "11" lives one level down, so the root does not see it.
    assert!(store.root().find_scope("11").await.unwrap().is_none());
    assert!(store.within("1").find_scope("11").await.unwrap().is_some());
}

#[tokio::test]
async fn fetched_scopes_anchor_operations_by_id() {
    let store = store();
    seed_numbered_tree(&store).await.unwrap();
    let twelve = store.within("1").find_scope("12").await.unwrap().unwrap();

    store
        .within_scope(twelve.clone())
        .create_scope("123")
        .await
        .unwrap();
    let children = store.within("1/12").query_scopes().fetch().await.unwrap();
    assert_eq!(children.names(), vec!["121", "122", "123"]);
    assert_eq!(store.within_scope(twelve).selector().describe(), "12");
}

#[tokio::test]
async fn creation_under_a_missing_parent_fails() {
    let store = store();
    let result = store.within("nope").create_scope("child").await;
    assert!(matches!(result, Err(StoreError::MissingScope { .. })));
    assert_eq!(store.backend().row_count(), 0);
}
