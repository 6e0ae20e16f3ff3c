//! In-memory backend.
//!
//! Keeps the whole table as a `Vec` of rows behind a mutex. A transaction
//! clones the state on begin and publishes it back on commit, so readers
//! see a consistent snapshot and dropped transactions discard their writes.
//! Concurrent transactions are last-write-wins; this backend exists for
//! tests and single-writer embedded use, not contended production traffic.
//!
//! Query methods deliberately mirror the SQL the PostgreSQL backend emits,
//! row order included, so either backend can sit under the engine
//! interchangeably.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::constants::SCOPE_KEY;
use crate::error::StoreResult;
use crate::models::{EntryType, Scope, Scopes, StoreEntry};
use crate::query::{LimitClause, OrderBy, Predicate, ScopeColumn, ScopeFilter, SortDirection};

use super::{StoreBackend, StoreTransaction};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    rows: Vec<StoreEntry>,
    next_id: i64,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared in-memory table.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of rows currently committed, identity rows included.
    pub fn row_count(&self) -> usize {
        self.state.lock().rows.len()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> StoreResult<Self::Tx> {
        let working = self.state.lock().clone();
        Ok(MemoryTransaction {
            shared: Arc::clone(&self.state),
            working,
        })
    }
}

/// Snapshot transaction over the in-memory table.
pub struct MemoryTransaction {
    shared: Arc<Mutex<MemoryState>>,
    working: MemoryState,
}

impl MemoryTransaction {
    fn identity_rows(&self) -> impl Iterator<Item = &StoreEntry> {
        self.working
            .rows
            .iter()
            .filter(|r| r.entry_type == EntryType::Scope && r.entry_key == SCOPE_KEY)
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn select_scopes(
        &mut self,
        parent: Option<i64>,
        filters: &[ScopeFilter],
    ) -> StoreResult<Scopes> {
        let scopes = self
            .identity_rows()
            .filter(|r| r.scope_id == parent)
            .map(|r| Scope::new(r.id, r.entry_value.clone()))
            .filter(|scope| filters.iter().all(|f| f.matches(scope)))
            .collect();
        Ok(scopes)
    }

    async fn select_record_scope_ids(
        &mut self,
        candidates: &HashSet<i64>,
        key: &str,
        predicates: &[Predicate<String>],
    ) -> StoreResult<HashSet<i64>> {
        let matched = self
            .working
            .rows
            .iter()
            .filter(|r| r.entry_key == key)
            .filter(|r| r.scope_id.map_or(false, |sid| candidates.contains(&sid)))
            .filter(|r| predicates.iter().all(|p| p.matches(&r.entry_value)))
            .filter_map(|r| r.scope_id)
            .collect();
        Ok(matched)
    }

    async fn select_scopes_by_ids(
        &mut self,
        ids: &[i64],
        order: &[OrderBy],
        limit: Option<LimitClause>,
    ) -> StoreResult<Scopes> {
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        let mut scopes: Vec<Scope> = self
            .identity_rows()
            .filter(|r| wanted.contains(&r.id))
            .map(|r| Scope::new(r.id, r.entry_value.clone()))
            .collect();
        if !order.is_empty() {
            scopes.sort_by(|a, b| compare_scopes(a, b, order));
        }
        if let Some(limit) = limit {
            scopes = scopes
                .into_iter()
                .skip(limit.offset as usize)
                .take(limit.limit as usize)
                .collect();
        }
        Ok(Scopes::from(scopes))
    }

    async fn select_child_scope_ids(
        &mut self,
        parents: &HashSet<i64>,
    ) -> StoreResult<HashSet<i64>> {
        let children = self
            .identity_rows()
            .filter(|r| r.scope_id.map_or(false, |sid| parents.contains(&sid)))
            .map(|r| r.id)
            .collect();
        Ok(children)
    }

    async fn find_scope_by_name(
        &mut self,
        parent: Option<i64>,
        name: &str,
    ) -> StoreResult<Option<Scope>> {
        let scope = self
            .identity_rows()
            .find(|r| r.scope_id == parent && r.entry_value == name)
            .map(|r| Scope::new(r.id, r.entry_value.clone()));
        Ok(scope)
    }

    async fn insert_scope(&mut self, parent: Option<i64>, name: &str) -> StoreResult<Scope> {
        let id = self.working.allocate_id();
        self.working.rows.push(StoreEntry {
            id,
            scope_id: parent,
            entry_type: EntryType::Scope,
            entry_key: SCOPE_KEY.to_string(),
            entry_value: name.to_string(),
        });
        Ok(Scope::new(id, name))
    }

    async fn select_entries(&mut self, scope: Option<i64>) -> StoreResult<Vec<StoreEntry>> {
        let entries = self
            .working
            .rows
            .iter()
            .filter(|r| r.entry_type == EntryType::Value && r.scope_id == scope)
            .cloned()
            .collect();
        Ok(entries)
    }

    async fn select_record_values(
        &mut self,
        scope: Option<i64>,
        key: &str,
    ) -> StoreResult<Vec<String>> {
        let values = self
            .working
            .rows
            .iter()
            .filter(|r| {
                r.entry_type == EntryType::Value && r.scope_id == scope && r.entry_key == key
            })
            .map(|r| r.entry_value.clone())
            .collect();
        Ok(values)
    }

    async fn insert_record(
        &mut self,
        scope: Option<i64>,
        key: &str,
        value: &str,
    ) -> StoreResult<()> {
        let id = self.working.allocate_id();
        self.working.rows.push(StoreEntry {
            id,
            scope_id: scope,
            entry_type: EntryType::Value,
            entry_key: key.to_string(),
            entry_value: value.to_string(),
        });
        Ok(())
    }

    async fn delete_records(&mut self, scope: Option<i64>, key: &str) -> StoreResult<u64> {
        let before = self.working.rows.len();
        self.working.rows.retain(|r| {
            !(r.entry_type == EntryType::Value && r.scope_id == scope && r.entry_key == key)
        });
        Ok((before - self.working.rows.len()) as u64)
    }

    async fn delete_scope_rows(&mut self, ids: &HashSet<i64>) -> StoreResult<u64> {
        let before = self.working.rows.len();
        self.working.rows.retain(|r| {
            let owned_by_target = r.scope_id.map_or(false, |sid| ids.contains(&sid));
            let is_target_identity = ids.contains(&r.id);
            !(owned_by_target || is_target_identity)
        });
        Ok((before - self.working.rows.len()) as u64)
    }

    async fn commit(self) -> StoreResult<()> {
        *self.shared.lock() = self.working;
        Ok(())
    }
}

fn compare_scopes(a: &Scope, b: &Scope, order: &[OrderBy]) -> Ordering {
    for criterion in order {
        let ordering = match criterion.column {
            ScopeColumn::Id => a.id.cmp(&b.id),
            ScopeColumn::Name => a.name.cmp(&b.name),
        };
        let ordering = match criterion.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
