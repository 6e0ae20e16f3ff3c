//! Scope creation and lookup.
//!
//! Creation enforces the two structural rules the rest of the engine
//! relies on: names address exactly one sibling, and names never contain
//! the path separator that would make them unaddressable.

use tracing::debug;

use crate::backend::{StoreBackend, StoreTransaction};
use crate::constants::PATH_SEPARATOR;
use crate::error::{StoreError, StoreResult};
use crate::models::Scope;

use super::resolver::{self, ScopeSelector};

pub(crate) async fn create_scope<B: StoreBackend>(
    backend: &B,
    selector: &ScopeSelector,
    name: &str,
) -> StoreResult<Scope> {
    validate_name(name)?;
    let mut tx = backend.begin().await?;
    let parent = resolver::resolve(&mut tx, selector).await?;
    if tx.find_scope_by_name(parent, name).await?.is_some() {
        return Err(StoreError::duplicate_scope(name));
    }
    let scope = tx.insert_scope(parent, name).await?;
    tx.commit().await?;
    debug!(scope_id = scope.id, name = %scope.name, "created scope");
    Ok(scope)
}

pub(crate) async fn find_scope<B: StoreBackend>(
    backend: &B,
    selector: &ScopeSelector,
    name: &str,
) -> StoreResult<Option<Scope>> {
    let mut tx = backend.begin().await?;
    let parent = resolver::resolve(&mut tx, selector).await?;
    tx.find_scope_by_name(parent, name).await
}

/// Find-or-create: returns the existing child when present, otherwise
/// creates it.
pub(crate) async fn ensure_scope<B: StoreBackend>(
    backend: &B,
    selector: &ScopeSelector,
    name: &str,
) -> StoreResult<Scope> {
    validate_name(name)?;
    let mut tx = backend.begin().await?;
    let parent = resolver::resolve(&mut tx, selector).await?;
    if let Some(existing) = tx.find_scope_by_name(parent, name).await? {
        return Ok(existing);
    }
    let scope = tx.insert_scope(parent, name).await?;
    tx.commit().await?;
    debug!(scope_id = scope.id, name = %scope.name, "created scope");
    Ok(scope)
}

fn validate_name(name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::invalid_scope_name(name, "must not be empty"));
    }
    if name.contains(PATH_SEPARATOR) {
        return Err(StoreError::invalid_scope_name(
            name,
            "must not contain the path separator '/'",
        ));
    }
    Ok(())
}
