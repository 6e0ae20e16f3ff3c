//! # Query Building Blocks
//!
//! Value types that describe a scope query: constraints on the scope
//! identity row, constraints on record rows grouped by key, ordering
//! criteria, and limits. Executors accumulate these and hand them to a
//! backend; nothing here touches the database.

pub mod predicate;

use std::collections::HashMap;

use crate::models::Scope;

pub use predicate::Predicate;

/// Sort direction for an ordering criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// The two orderable columns of a scope result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeColumn {
    Id,
    Name,
}

/// One ordering criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: ScopeColumn,
    pub direction: SortDirection,
}

/// Ordering criteria in registration order.
///
/// Re-registering a column keeps its original position and overwrites the
/// direction, so `order_by(Name).order_by(Id).order_by(Name DESC)` still
/// sorts by name first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderCriteria {
    orders: Vec<OrderBy>,
}

impl OrderCriteria {
    pub fn set(&mut self, column: ScopeColumn, direction: SortDirection) {
        if let Some(existing) = self.orders.iter_mut().find(|o| o.column == column) {
            existing.direction = direction;
        } else {
            self.orders.push(OrderBy { column, direction });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn as_slice(&self) -> &[OrderBy] {
        &self.orders
    }
}

/// Row limit with optional offset, rendered as `LIMIT n [OFFSET m]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitClause {
    pub limit: u64,
    pub offset: u64,
}

impl LimitClause {
    pub fn new(limit: u64) -> Self {
        Self { limit, offset: 0 }
    }

    pub fn with_offset(offset: u64, limit: u64) -> Self {
        Self { limit, offset }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        let mut sql = format!(" LIMIT {}", self.limit);
        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }
        sql
    }
}

/// A constraint on the scope identity row itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeFilter {
    Id(Predicate<i64>),
    Name(Predicate<String>),
}

impl ScopeFilter {
    /// Evaluate the filter against a scope.
    pub fn matches(&self, scope: &Scope) -> bool {
        match self {
            ScopeFilter::Id(predicate) => predicate.matches(&scope.id),
            ScopeFilter::Name(predicate) => predicate.matches(&scope.name),
        }
    }
}

/// All constraints accumulated by a query or deletion builder.
///
/// Scope filters apply to identity rows; record predicates are grouped by
/// record key, and predicates registered under the same key all apply to
/// the same row.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    scope: Vec<ScopeFilter>,
    records: HashMap<String, Vec<Predicate<String>>>,
}

impl FilterSet {
    pub fn push_scope_filter(&mut self, filter: ScopeFilter) {
        self.scope.push(filter);
    }

    pub fn push_record_predicate(&mut self, key: impl Into<String>, predicate: Predicate<String>) {
        self.records.entry(key.into()).or_default().push(predicate);
    }

    pub fn scope_filters(&self) -> &[ScopeFilter] {
        &self.scope
    }

    pub fn record_predicates(&self) -> &HashMap<String, Vec<Predicate<String>>> {
        &self.records
    }

    /// True when no scope filter and no record predicate has been registered.
    /// Unconstrained deletions are refused unless explicitly allowed.
    pub fn is_unconstrained(&self) -> bool {
        self.scope.is_empty() && self.records.is_empty()
    }
}
