//! Record value operations.
//!
//! Records are plain key/value strings attached to a scope, the root
//! included. Keys are not unique; [`add_value`] appends another value
//! under the same key while [`set_value`] replaces all of them.

use crate::backend::{StoreBackend, StoreTransaction};
use crate::error::StoreResult;
use crate::models::StoreEntry;

use super::resolver::{self, ScopeSelector};

/// Replace every value stored under `key` with a single value.
pub(crate) async fn set_value<B: StoreBackend>(
    backend: &B,
    selector: &ScopeSelector,
    key: &str,
    value: &str,
) -> StoreResult<()> {
    let mut tx = backend.begin().await?;
    let scope = resolver::resolve(&mut tx, selector).await?;
    tx.delete_records(scope, key).await?;
    tx.insert_record(scope, key, value).await?;
    tx.commit().await
}

/// Append a value under `key`, keeping any existing values.
pub(crate) async fn add_value<B: StoreBackend>(
    backend: &B,
    selector: &ScopeSelector,
    key: &str,
    value: &str,
) -> StoreResult<()> {
    let mut tx = backend.begin().await?;
    let scope = resolver::resolve(&mut tx, selector).await?;
    tx.insert_record(scope, key, value).await?;
    tx.commit().await
}

/// First value stored under `key`, in insertion order.
pub(crate) async fn get_value<B: StoreBackend>(
    backend: &B,
    selector: &ScopeSelector,
    key: &str,
) -> StoreResult<Option<String>> {
    let values = get_values(backend, selector, key).await?;
    Ok(values.into_iter().next())
}

/// Every value stored under `key`, in insertion order.
pub(crate) async fn get_values<B: StoreBackend>(
    backend: &B,
    selector: &ScopeSelector,
    key: &str,
) -> StoreResult<Vec<String>> {
    let mut tx = backend.begin().await?;
    let scope = resolver::resolve(&mut tx, selector).await?;
    tx.select_record_values(scope, key).await
}

/// Remove every value stored under `key`, returning how many there were.
pub(crate) async fn unset_value<B: StoreBackend>(
    backend: &B,
    selector: &ScopeSelector,
    key: &str,
) -> StoreResult<u64> {
    let mut tx = backend.begin().await?;
    let scope = resolver::resolve(&mut tx, selector).await?;
    let removed = tx.delete_records(scope, key).await?;
    tx.commit().await?;
    Ok(removed)
}

/// All records of the scope, in insertion order.
pub(crate) async fn entries<B: StoreBackend>(
    backend: &B,
    selector: &ScopeSelector,
) -> StoreResult<Vec<StoreEntry>> {
    let mut tx = backend.begin().await?;
    let scope = resolver::resolve(&mut tx, selector).await?;
    tx.select_entries(scope).await
}
