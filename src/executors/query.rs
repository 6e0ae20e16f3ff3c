//! Scope query executor.
//!
//! A by-value builder that accumulates constraints, ordering, and limits,
//! then runs the full pipeline in a single transaction on
//! [`fetch`](ScopeQueryExecutor::fetch). Building is pure; no database
//! work happens until a terminal method is called.

use tracing::debug;

use crate::backend::{StoreBackend, StoreTransaction};
use crate::error::StoreResult;
use crate::models::{Scope, Scopes};
use crate::query::{
    FilterSet, LimitClause, OrderCriteria, Predicate, ScopeColumn, ScopeFilter, SortDirection,
};

use super::pipeline;
use super::resolver::{self, ScopeSelector};

pub struct ScopeQueryExecutor<'a, B: StoreBackend> {
    backend: &'a B,
    selector: ScopeSelector,
    filters: FilterSet,
    order: OrderCriteria,
    limit: Option<LimitClause>,
}

impl<'a, B: StoreBackend> ScopeQueryExecutor<'a, B> {
    pub(crate) fn new(backend: &'a B, selector: ScopeSelector) -> Self {
        Self {
            backend,
            selector,
            filters: FilterSet::default(),
            order: OrderCriteria::default(),
            limit: None,
        }
    }

    /// Constrain candidates by scope id.
    pub fn where_scope_id(mut self, predicate: Predicate<i64>) -> Self {
        self.filters.push_scope_filter(ScopeFilter::Id(predicate));
        self
    }

    /// Constrain candidates by scope name.
    pub fn where_scope_name(mut self, predicate: Predicate<String>) -> Self {
        self.filters.push_scope_filter(ScopeFilter::Name(predicate));
        self
    }

    /// Constrain candidates by the value of the record stored under `key`.
    /// Repeated calls with the same key AND together against that record.
    pub fn where_record(mut self, key: impl Into<String>, predicate: Predicate<String>) -> Self {
        self.filters.push_record_predicate(key, predicate);
        self
    }

    /// Order results by scope id. Re-registering a column overwrites its
    /// direction but keeps its original precedence.
    pub fn order_by_scope_id(mut self, direction: SortDirection) -> Self {
        self.order.set(ScopeColumn::Id, direction);
        self
    }

    /// Order results by scope name.
    pub fn order_by_scope_name(mut self, direction: SortDirection) -> Self {
        self.order.set(ScopeColumn::Name, direction);
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(LimitClause::new(limit));
        self
    }

    /// Cap the number of results, skipping `offset` rows first.
    pub fn limit_with_offset(mut self, offset: u64, limit: u64) -> Self {
        self.limit = Some(LimitClause::with_offset(offset, limit));
        self
    }

    /// Resolve the selector and run the query stages in one transaction.
    pub async fn fetch(self) -> StoreResult<Scopes> {
        let mut tx = self.backend.begin().await?;
        let parent = resolver::resolve(&mut tx, &self.selector).await?;
        let candidates = pipeline::query_candidates(&mut tx, parent, &self.filters).await?;
        let scopes = pipeline::apply_order_limit(&mut tx, candidates, &self.order, self.limit).await?;
        tx.commit().await?;
        debug!(
            scope = %self.selector.describe(),
            results = scopes.len(),
            "scope query"
        );
        Ok(scopes)
    }

    /// Fetch at most one scope.
    pub async fn first(mut self) -> StoreResult<Option<Scope>> {
        let offset = self.limit.map(|l| l.offset).unwrap_or(0);
        self.limit = Some(LimitClause::with_offset(offset, 1));
        Ok(self.fetch().await?.into_iter().next())
    }

    /// Number of scopes the query matches, limits included.
    pub async fn count(self) -> StoreResult<usize> {
        Ok(self.fetch().await?.len())
    }

    /// True when the query matches at least one scope.
    pub async fn exists(self) -> StoreResult<bool> {
        Ok(self.first().await?.is_some())
    }
}
