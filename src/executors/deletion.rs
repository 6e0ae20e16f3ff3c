//! Scope deletion executor.
//!
//! Deletion shares the narrowing pipeline with queries and then removes
//! every row belonging to the matched scopes. Two explicit opt-ins guard
//! the destructive paths: [`allow_bulk`](ScopeDeletionExecutor::allow_bulk)
//! for deletions with no constraints at all, and
//! [`allow_recursion`](ScopeDeletionExecutor::allow_recursion) to extend
//! the deletion to every descendant of the matched scopes. Without
//! recursion, rows owned by deleted scopes go away but deeper descendants
//! survive as unreachable rows.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::backend::{StoreBackend, StoreTransaction};
use crate::error::{StoreError, StoreResult};
use crate::query::{FilterSet, Predicate, ScopeFilter};

use super::pipeline;
use super::resolver::{self, ScopeSelector};

pub struct ScopeDeletionExecutor<'a, B: StoreBackend> {
    backend: &'a B,
    selector: ScopeSelector,
    filters: FilterSet,
    allow_bulk: bool,
    allow_recursion: bool,
}

impl<'a, B: StoreBackend> ScopeDeletionExecutor<'a, B> {
    pub(crate) fn new(backend: &'a B, selector: ScopeSelector) -> Self {
        Self {
            backend,
            selector,
            filters: FilterSet::default(),
            allow_bulk: false,
            allow_recursion: false,
        }
    }

    /// Constrain doomed scopes by id.
    pub fn where_scope_id(mut self, predicate: Predicate<i64>) -> Self {
        self.filters.push_scope_filter(ScopeFilter::Id(predicate));
        self
    }

    /// Constrain doomed scopes by name.
    pub fn where_scope_name(mut self, predicate: Predicate<String>) -> Self {
        self.filters.push_scope_filter(ScopeFilter::Name(predicate));
        self
    }

    /// Constrain doomed scopes by the value of the record under `key`.
    pub fn where_record(mut self, key: impl Into<String>, predicate: Predicate<String>) -> Self {
        self.filters.push_record_predicate(key, predicate);
        self
    }

    /// Permit deleting every scope under the selector when no constraint
    /// was registered.
    pub fn allow_bulk(mut self) -> Self {
        self.allow_bulk = true;
        self
    }

    /// Extend the deletion to all descendants of the matched scopes.
    pub fn allow_recursion(mut self) -> Self {
        self.allow_recursion = true;
        self
    }

    /// Resolve, gate, match, optionally expand, and delete, all in one
    /// transaction. Returns the number of rows removed.
    pub async fn execute(self) -> StoreResult<u64> {
        let mut tx = self.backend.begin().await?;
        let parent = resolver::resolve(&mut tx, &self.selector).await?;

        // The gate runs before any candidate work so a refused deletion
        // leaves no trace beyond the resolution reads.
        if self.filters.is_unconstrained() && !self.allow_bulk {
            warn!(
                scope = %self.selector.describe(),
                "unconstrained deletion rejected; call allow_bulk() to permit"
            );
            return Err(StoreError::bulk_deletion_disallowed(self.selector.describe()));
        }

        let candidates = pipeline::query_candidates(&mut tx, parent, &self.filters).await?;
        let mut doomed = candidates.id_set();
        if self.allow_recursion {
            collect_descendants(&mut tx, &mut doomed).await?;
        }

        let removed = if doomed.is_empty() {
            0
        } else {
            tx.delete_scope_rows(&doomed).await?
        };
        tx.commit().await?;
        info!(
            scope = %self.selector.describe(),
            scopes = doomed.len(),
            rows = removed,
            "scope deletion"
        );
        Ok(removed)
    }
}

/// Grow `doomed` breadth-first until it covers every descendant. The
/// frontier only ever carries ids not yet in `doomed`, so the loop
/// terminates on any row arrangement, cyclic parent links included.
async fn collect_descendants<T: StoreTransaction>(
    tx: &mut T,
    doomed: &mut HashSet<i64>,
) -> StoreResult<()> {
    let mut frontier: HashSet<i64> = doomed.clone();
    while !frontier.is_empty() {
        let children = tx.select_child_scope_ids(&frontier).await?;
        frontier = children.difference(doomed).copied().collect();
        doomed.extend(frontier.iter().copied());
    }
    Ok(())
}
