//! # Storage Backends
//!
//! Capability traits that separate the execution engine from row storage.
//! The engine only ever asks a backend for a transaction and then drives
//! the narrow query surface below; everything about SQL text, pooling, and
//! row layout stays behind these traits.
//!
//! Two implementations ship with the crate: [`postgres::PgBackend`] for
//! production use and [`memory::MemoryBackend`] for tests and embedded
//! development setups.

pub mod memory;
pub mod postgres;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{Scope, Scopes, StoreEntry};
use crate::query::{LimitClause, OrderBy, Predicate, ScopeFilter};

pub use memory::MemoryBackend;
pub use postgres::PgBackend;

/// A handle capable of opening transactions against the backing table.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    type Tx: StoreTransaction;

    /// Begin a transaction. Every engine operation, reads included, runs
    /// inside one so multi-stage queries observe a single snapshot.
    async fn begin(&self) -> StoreResult<Self::Tx>;
}

/// One open transaction.
///
/// Dropping a transaction without calling [`commit`](Self::commit) discards
/// its writes.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Scopes directly under `parent` (`None` = root) whose identity row
    /// passes every filter. Result order is backend row order.
    async fn select_scopes(
        &mut self,
        parent: Option<i64>,
        filters: &[ScopeFilter],
    ) -> StoreResult<Scopes>;

    /// Of the scopes in `candidates`, the ids owning at least one record
    /// with `key` whose value passes every predicate.
    async fn select_record_scope_ids(
        &mut self,
        candidates: &HashSet<i64>,
        key: &str,
        predicates: &[Predicate<String>],
    ) -> StoreResult<HashSet<i64>>;

    /// Re-select identity rows by id with explicit ordering and limits.
    async fn select_scopes_by_ids(
        &mut self,
        ids: &[i64],
        order: &[OrderBy],
        limit: Option<LimitClause>,
    ) -> StoreResult<Scopes>;

    /// Ids of scopes whose parent is any member of `parents`. One level
    /// only; callers drive the traversal.
    async fn select_child_scope_ids(&mut self, parents: &HashSet<i64>) -> StoreResult<HashSet<i64>>;

    /// The child of `parent` named `name`, if present. Sibling names are
    /// unique, so at most one row can match.
    async fn find_scope_by_name(
        &mut self,
        parent: Option<i64>,
        name: &str,
    ) -> StoreResult<Option<Scope>>;

    /// Insert a scope identity row under `parent` and return the new scope.
    async fn insert_scope(&mut self, parent: Option<i64>, name: &str) -> StoreResult<Scope>;

    /// All user records attached to `scope`, in insertion order.
    async fn select_entries(&mut self, scope: Option<i64>) -> StoreResult<Vec<StoreEntry>>;

    /// Values of every record with `key` under `scope`, in insertion order.
    async fn select_record_values(
        &mut self,
        scope: Option<i64>,
        key: &str,
    ) -> StoreResult<Vec<String>>;

    /// Append a user record under `scope`. Keys are not unique; repeated
    /// inserts accumulate values.
    async fn insert_record(&mut self, scope: Option<i64>, key: &str, value: &str)
        -> StoreResult<()>;

    /// Remove every record with `key` under `scope`, returning the number
    /// of rows removed.
    async fn delete_records(&mut self, scope: Option<i64>, key: &str) -> StoreResult<u64>;

    /// Remove every row belonging to any scope in `ids` (records and child
    /// identity rows) together with the identity rows of the scopes
    /// themselves. Returns the number of rows removed.
    async fn delete_scope_rows(&mut self, ids: &HashSet<i64>) -> StoreResult<u64>;

    /// Make the transaction's writes durable.
    async fn commit(self) -> StoreResult<()>;
}
