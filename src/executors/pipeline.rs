//! Candidate narrowing pipeline shared by queries and deletions.
//!
//! Results are produced in up to three stages, each running against the
//! same transaction and each only ever shrinking the candidate set:
//!
//! 1. identity stage: scopes directly under the parent whose identity row
//!    passes the scope filters;
//! 2. record stage: for every constrained record key, keep only the
//!    candidates owning a matching record;
//! 3. ordering stage: when ordering or limits were requested, re-select
//!    the survivors by id with `ORDER BY` and `LIMIT` applied.
//!
//! An empty set after any stage short-circuits the rest.

use std::collections::HashMap;

use tracing::debug;

use crate::backend::StoreTransaction;
use crate::error::StoreResult;
use crate::models::Scopes;
use crate::query::{FilterSet, LimitClause, OrderCriteria, Predicate};

/// Stages 1 and 2: identity query followed by per-key record narrowing.
pub(crate) async fn query_candidates<T: StoreTransaction>(
    tx: &mut T,
    parent: Option<i64>,
    filters: &FilterSet,
) -> StoreResult<Scopes> {
    let candidates = tx.select_scopes(parent, filters.scope_filters()).await?;
    debug!(candidates = candidates.len(), "scope identity stage");
    narrow_by_records(tx, candidates, filters.record_predicates()).await
}

async fn narrow_by_records<T: StoreTransaction>(
    tx: &mut T,
    candidates: Scopes,
    records: &HashMap<String, Vec<Predicate<String>>>,
) -> StoreResult<Scopes> {
    if candidates.is_empty() || records.is_empty() {
        return Ok(candidates);
    }
    let mut surviving = candidates.id_set();
    for (key, predicates) in records {
        if surviving.is_empty() {
            break;
        }
        surviving = tx
            .select_record_scope_ids(&surviving, key, predicates)
            .await?;
    }
    debug!(surviving = surviving.len(), "record constraint stage");
    Ok(candidates.filter_by_ids(&surviving))
}

/// Stage 3: re-select survivors by id with ordering and limits. Skipped
/// entirely when neither was requested, leaving stage order untouched.
pub(crate) async fn apply_order_limit<T: StoreTransaction>(
    tx: &mut T,
    candidates: Scopes,
    order: &OrderCriteria,
    limit: Option<LimitClause>,
) -> StoreResult<Scopes> {
    if candidates.is_empty() || (order.is_empty() && limit.is_none()) {
        return Ok(candidates);
    }
    tx.select_scopes_by_ids(&candidates.ids(), order.as_slice(), limit)
        .await
}
