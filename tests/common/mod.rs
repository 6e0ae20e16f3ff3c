//! Shared fixtures for integration tests.
//!
//! All integration tests run against the in-memory backend, which mirrors
//! the SQL the PostgreSQL backend emits query for query.

#![allow(dead_code)]

use scopestore::{MemoryBackend, ScopeStore, StoreResult};

pub fn store() -> ScopeStore<MemoryBackend> {
    ScopeStore::in_memory()
}

/// Seed the seven-scope tree shared by the deletion tests:
///
/// ```text
/// root
/// ├── 1
/// │   ├── 11
/// │   └── 12
/// │       ├── 121
/// │       └── 122
/// └── 2
///     └── 21
/// ```
pub async fn seed_numbered_tree(store: &ScopeStore<MemoryBackend>) -> StoreResult<()> {
    store.root().create_scope("1").await?;
    store.root().create_scope("2").await?;
    store.within("1").create_scope("11").await?;
    store.within("1").create_scope("12").await?;
    store.within("2").create_scope("21").await?;
    store.within("1/12").create_scope("121").await?;
    store.within("1/12").create_scope("122").await?;
    Ok(())
}

/// Seed four flat service scopes carrying `host` and `region` records:
///
/// | scope  | host  | region |
/// |--------|-------|--------|
/// | svc-a  | web-1 | east   |
/// | svc-b  | web-2 | west   |
/// | svc-c  | db-1  | east   |
/// | svc-d  | db-2  | west   |
pub async fn seed_fleet(store: &ScopeStore<MemoryBackend>) -> StoreResult<()> {
    for (name, host, region) in [
        ("svc-a", "web-1", "east"),
        ("svc-b", "web-2", "west"),
        ("svc-c", "db-1", "east"),
        ("svc-d", "db-2", "west"),
    ] {
        store.root().create_scope(name).await?;
        store.within(name).set_value("host", host).await?;
        store.within(name).set_value("region", region).await?;
    }
    Ok(())
}

/// Seed scopes named "1" through "4" under the root, in shuffled creation
/// order so tests cannot accidentally rely on insertion order.
pub async fn seed_shuffled_digits(store: &ScopeStore<MemoryBackend>) -> StoreResult<()> {
    for name in ["3", "1", "4", "2"] {
        store.root().create_scope(name).await?;
    }
    Ok(())
}
