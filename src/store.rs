//! # Store Facade
//!
//! [`ScopeStore`] owns a backend; [`ScopeHandle`] anchors operations at a
//! point in the scope tree. Handles are cheap, hold no database state, and
//! defer all work (path resolution included) to the executor they hand out.

use crate::backend::{MemoryBackend, PgBackend, StoreBackend};
use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::executors::{creation, values, ScopeDeletionExecutor, ScopeQueryExecutor, ScopeSelector};
use crate::models::{Scope, StoreEntry};

/// Entry point to the scope tree.
pub struct ScopeStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> ScopeStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Anchor at the implicit root scope.
    pub fn root(&self) -> ScopeHandle<'_, B> {
        ScopeHandle {
            backend: &self.backend,
            selector: ScopeSelector::Root,
        }
    }

    /// Anchor at a `/`-separated path under the root. The path is not
    /// resolved until an operation runs, so a handle to a not-yet-created
    /// scope is fine to hold.
    pub fn within(&self, path: &str) -> ScopeHandle<'_, B> {
        ScopeHandle {
            backend: &self.backend,
            selector: ScopeSelector::from_path(path),
        }
    }

    /// Anchor at a path given as literal segments, for names that may
    /// contain separator characters.
    pub fn within_segments<I, S>(&self, segments: I) -> ScopeHandle<'_, B>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScopeHandle {
            backend: &self.backend,
            selector: ScopeSelector::from_segments(segments),
        }
    }

    /// Anchor at a scope fetched earlier, skipping path resolution.
    pub fn within_scope(&self, scope: Scope) -> ScopeHandle<'_, B> {
        ScopeHandle {
            backend: &self.backend,
            selector: ScopeSelector::Scope(scope),
        }
    }
}

impl ScopeStore<MemoryBackend> {
    /// A store over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl ScopeStore<PgBackend> {
    /// Connect to PostgreSQL and make sure the backing table exists.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let backend = PgBackend::connect(config).await?;
        backend.ensure_schema().await?;
        Ok(Self::new(backend))
    }
}

/// An anchored view of the tree: all operations run relative to the
/// selector this handle carries.
pub struct ScopeHandle<'a, B: StoreBackend> {
    backend: &'a B,
    selector: ScopeSelector,
}

impl<'a, B: StoreBackend> Clone for ScopeHandle<'a, B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend,
            selector: self.selector.clone(),
        }
    }
}

impl<'a, B: StoreBackend> ScopeHandle<'a, B> {
    pub fn selector(&self) -> &ScopeSelector {
        &self.selector
    }

    /// Start a query over the scopes directly under this handle.
    pub fn query_scopes(self) -> ScopeQueryExecutor<'a, B> {
        ScopeQueryExecutor::new(self.backend, self.selector)
    }

    /// Start a deletion over the scopes directly under this handle.
    pub fn delete_scopes(self) -> ScopeDeletionExecutor<'a, B> {
        ScopeDeletionExecutor::new(self.backend, self.selector)
    }

    /// Create a child scope. Fails with
    /// [`DuplicateScope`](crate::error::StoreError::DuplicateScope) when a
    /// sibling of that name already exists.
    pub async fn create_scope(self, name: &str) -> StoreResult<Scope> {
        creation::create_scope(self.backend, &self.selector, name).await
    }

    /// Fetch the child scope named `name`, creating it when absent.
    pub async fn ensure_scope(self, name: &str) -> StoreResult<Scope> {
        creation::ensure_scope(self.backend, &self.selector, name).await
    }

    /// Fetch the child scope named `name`, if present.
    pub async fn find_scope(self, name: &str) -> StoreResult<Option<Scope>> {
        creation::find_scope(self.backend, &self.selector, name).await
    }

    /// Replace all values stored under `key` with one value.
    pub async fn set_value(self, key: &str, value: &str) -> StoreResult<()> {
        values::set_value(self.backend, &self.selector, key, value).await
    }

    /// Append a value under `key`, keeping existing values.
    pub async fn add_value(self, key: &str, value: &str) -> StoreResult<()> {
        values::add_value(self.backend, &self.selector, key, value).await
    }

    /// First value stored under `key`, in insertion order.
    pub async fn get_value(self, key: &str) -> StoreResult<Option<String>> {
        values::get_value(self.backend, &self.selector, key).await
    }

    /// Every value stored under `key`, in insertion order.
    pub async fn get_values(self, key: &str) -> StoreResult<Vec<String>> {
        values::get_values(self.backend, &self.selector, key).await
    }

    /// Remove every value stored under `key`, returning how many there were.
    pub async fn unset_value(self, key: &str) -> StoreResult<u64> {
        values::unset_value(self.backend, &self.selector, key).await
    }

    /// All records attached to this scope, in insertion order.
    pub async fn entries(self) -> StoreResult<Vec<StoreEntry>> {
        values::entries(self.backend, &self.selector).await
    }
}
