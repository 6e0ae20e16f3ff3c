//! PostgreSQL backend.
//!
//! All rows live in a single table whose name is configurable. SQL is built
//! with [`QueryBuilder`] so every value travels as a bind parameter; the
//! table name is the only interpolated identifier and is validated at
//! construction.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Row, Transaction};
use tracing::debug;

use crate::config::{is_valid_table_name, StoreConfig};
use crate::constants::{DEFAULT_TABLE, SCOPE_KEY};
use crate::error::{StoreError, StoreResult};
use crate::models::{EntryType, Scope, Scopes, StoreEntry};
use crate::query::{LimitClause, OrderBy, Predicate, ScopeColumn, ScopeFilter};

use super::{StoreBackend, StoreTransaction};

/// Connection pool plus table name.
pub struct PgBackend {
    pool: PgPool,
    table: String,
}

impl PgBackend {
    /// Wrap an existing pool, using the default table name.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Wrap an existing pool with a custom table name.
    pub fn with_table(pool: PgPool, table: impl Into<String>) -> StoreResult<Self> {
        let table = table.into();
        if !is_valid_table_name(&table) {
            return Err(StoreError::configuration(format!(
                "table name '{table}' must match [A-Za-z_][A-Za-z0-9_]*"
            )));
        }
        Ok(Self { pool, table })
    }

    /// Open a pool from configuration.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
            .connect(&config.database.url)
            .await?;
        debug!(
            table = %config.table,
            max_connections = config.database.max_connections,
            "connected scope store pool"
        );
        Ok(Self {
            pool,
            table: config.table.clone(),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the backing table and its indexes if they do not exist.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::raw_sql(&schema_sql(&self.table))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn health_check(&self) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await?;
        let health: i32 = row.get("health");
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StoreBackend for PgBackend {
    type Tx = PgStoreTransaction;

    async fn begin(&self) -> StoreResult<Self::Tx> {
        let tx = self.pool.begin().await?;
        Ok(PgStoreTransaction {
            tx,
            table: self.table.clone(),
        })
    }
}

/// One open PostgreSQL transaction. Dropped without commit, it rolls back.
pub struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
    table: String,
}

impl PgStoreTransaction {
    /// `SELECT id, entry_value AS name FROM <table> WHERE entry_type = $1
    /// AND entry_key = $2`, the prefix every identity-row query starts from.
    fn identity_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder: QueryBuilder<'static, Postgres> = QueryBuilder::new(format!(
            "SELECT id, entry_value AS name FROM {} WHERE entry_type = ",
            self.table
        ));
        builder.push_bind(EntryType::Scope.as_i16());
        builder.push(" AND entry_key = ");
        builder.push_bind(SCOPE_KEY);
        builder
    }
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn select_scopes(
        &mut self,
        parent: Option<i64>,
        filters: &[ScopeFilter],
    ) -> StoreResult<Scopes> {
        let mut builder = self.identity_query();
        push_parent_clause(&mut builder, parent);
        for filter in filters {
            push_scope_filter(&mut builder, filter);
        }
        let scopes = builder
            .build_query_as::<Scope>()
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(Scopes::from(scopes))
    }

    async fn select_record_scope_ids(
        &mut self,
        candidates: &HashSet<i64>,
        key: &str,
        predicates: &[Predicate<String>],
    ) -> StoreResult<HashSet<i64>> {
        if candidates.is_empty() {
            return Ok(HashSet::new());
        }
        let ids: Vec<i64> = candidates.iter().copied().collect();
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT DISTINCT scope_id FROM {} WHERE entry_key = ",
            self.table
        ));
        builder.push_bind(key.to_string());
        builder.push(" AND scope_id = ANY(");
        builder.push_bind(ids);
        builder.push(")");
        for predicate in predicates {
            predicate.push_sql(&mut builder, "entry_value");
        }
        let matched: Vec<i64> = builder
            .build_query_scalar::<i64>()
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(matched.into_iter().collect())
    }

    async fn select_scopes_by_ids(
        &mut self,
        ids: &[i64],
        order: &[OrderBy],
        limit: Option<LimitClause>,
    ) -> StoreResult<Scopes> {
        if ids.is_empty() {
            return Ok(Scopes::new());
        }
        let mut builder = self.identity_query();
        builder.push(" AND id = ANY(");
        builder.push_bind(ids.to_vec());
        builder.push(")");
        if !order.is_empty() {
            builder.push(" ORDER BY ");
            for (i, criterion) in order.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                builder.push(column_sql(criterion.column));
                builder.push(" ");
                builder.push(criterion.direction.as_sql());
            }
        }
        if let Some(limit) = limit {
            builder.push(limit.to_sql());
        }
        let scopes = builder
            .build_query_as::<Scope>()
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(Scopes::from(scopes))
    }

    async fn select_child_scope_ids(
        &mut self,
        parents: &HashSet<i64>,
    ) -> StoreResult<HashSet<i64>> {
        if parents.is_empty() {
            return Ok(HashSet::new());
        }
        let ids: Vec<i64> = parents.iter().copied().collect();
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT id FROM {} WHERE entry_type = ", self.table));
        builder.push_bind(EntryType::Scope.as_i16());
        builder.push(" AND entry_key = ");
        builder.push_bind(SCOPE_KEY);
        builder.push(" AND scope_id = ANY(");
        builder.push_bind(ids);
        builder.push(")");
        let children: Vec<i64> = builder
            .build_query_scalar::<i64>()
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(children.into_iter().collect())
    }

    async fn find_scope_by_name(
        &mut self,
        parent: Option<i64>,
        name: &str,
    ) -> StoreResult<Option<Scope>> {
        let mut builder = self.identity_query();
        push_parent_clause(&mut builder, parent);
        builder.push(" AND entry_value = ");
        builder.push_bind(name.to_string());
        builder.push(" LIMIT 1");
        let scope = builder
            .build_query_as::<Scope>()
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(scope)
    }

    async fn insert_scope(&mut self, parent: Option<i64>, name: &str) -> StoreResult<Scope> {
        let sql = format!(
            "INSERT INTO {} (scope_id, entry_type, entry_key, entry_value) \
             VALUES ($1, $2, $3, $4) RETURNING id",
            self.table
        );
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(parent)
            .bind(EntryType::Scope.as_i16())
            .bind(SCOPE_KEY)
            .bind(name)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(Scope::new(id, name))
    }

    async fn select_entries(&mut self, scope: Option<i64>) -> StoreResult<Vec<StoreEntry>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT id, scope_id, entry_type, entry_key, entry_value FROM {} WHERE entry_type = ",
            self.table
        ));
        builder.push_bind(EntryType::Value.as_i16());
        push_parent_clause(&mut builder, scope);
        builder.push(" ORDER BY id");
        let entries = builder
            .build_query_as::<StoreEntry>()
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(entries)
    }

    async fn select_record_values(
        &mut self,
        scope: Option<i64>,
        key: &str,
    ) -> StoreResult<Vec<String>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT entry_value FROM {} WHERE entry_type = ",
            self.table
        ));
        builder.push_bind(EntryType::Value.as_i16());
        builder.push(" AND entry_key = ");
        builder.push_bind(key.to_string());
        push_parent_clause(&mut builder, scope);
        builder.push(" ORDER BY id");
        let values = builder
            .build_query_scalar::<String>()
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(values)
    }

    async fn insert_record(
        &mut self,
        scope: Option<i64>,
        key: &str,
        value: &str,
    ) -> StoreResult<()> {
        let sql = format!(
            "INSERT INTO {} (scope_id, entry_type, entry_key, entry_value) \
             VALUES ($1, $2, $3, $4)",
            self.table
        );
        sqlx::query(&sql)
            .bind(scope)
            .bind(EntryType::Value.as_i16())
            .bind(key)
            .bind(value)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_records(&mut self, scope: Option<i64>, key: &str) -> StoreResult<u64> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("DELETE FROM {} WHERE entry_type = ", self.table));
        builder.push_bind(EntryType::Value.as_i16());
        builder.push(" AND entry_key = ");
        builder.push_bind(key.to_string());
        push_parent_clause(&mut builder, scope);
        let result = builder.build().execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }

    async fn delete_scope_rows(&mut self, ids: &HashSet<i64>) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<i64> = ids.iter().copied().collect();
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("DELETE FROM {} WHERE scope_id = ANY(", self.table));
        builder.push_bind(ids.clone());
        builder.push(") OR id = ANY(");
        builder.push_bind(ids);
        builder.push(")");
        let result = builder.build().execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }

    async fn commit(self) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

fn push_parent_clause(builder: &mut QueryBuilder<'_, Postgres>, parent: Option<i64>) {
    match parent {
        Some(id) => {
            builder.push(" AND scope_id = ");
            builder.push_bind(id);
        }
        None => {
            builder.push(" AND scope_id IS NULL");
        }
    }
}

fn push_scope_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ScopeFilter) {
    match filter {
        ScopeFilter::Id(predicate) => predicate.push_sql(builder, "id"),
        ScopeFilter::Name(predicate) => predicate.push_sql(builder, "entry_value"),
    }
}

fn column_sql(column: ScopeColumn) -> &'static str {
    match column {
        ScopeColumn::Id => "id",
        ScopeColumn::Name => "entry_value",
    }
}

fn schema_sql(table: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id BIGSERIAL PRIMARY KEY,
            scope_id BIGINT,
            entry_type SMALLINT NOT NULL,
            entry_key TEXT NOT NULL,
            entry_value TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_{table}_scope_key ON {table} (scope_id, entry_key);
        CREATE INDEX IF NOT EXISTS idx_{table}_type_key ON {table} (entry_type, entry_key);
        "#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Predicate, SortDirection};

    #[test]
    fn test_schema_sql_targets_configured_table() {
        let sql = schema_sql("custom_entries");
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS custom_entries"));
        assert!(sql.contains("idx_custom_entries_scope_key"));
        assert!(sql.contains("idx_custom_entries_type_key"));
        assert!(sql.contains("scope_id BIGINT"));
    }

    #[test]
    fn test_parent_clause_root_uses_is_null() {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 WHERE 1 = 1");
        push_parent_clause(&mut builder, None);
        assert!(builder.sql().ends_with("AND scope_id IS NULL"));

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 WHERE 1 = 1");
        push_parent_clause(&mut builder, Some(9));
        assert!(builder.sql().ends_with("AND scope_id = $1"));
    }

    #[test]
    fn test_scope_filter_columns() {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 WHERE 1 = 1");
        push_scope_filter(&mut builder, &ScopeFilter::Id(Predicate::Equal(3)));
        push_scope_filter(
            &mut builder,
            &ScopeFilter::Name(Predicate::Equal("etl".to_string())),
        );
        assert!(builder.sql().contains("id = $1"));
        assert!(builder.sql().contains("entry_value = $2"));
    }

    #[test]
    fn test_order_column_mapping() {
        assert_eq!(column_sql(ScopeColumn::Id), "id");
        assert_eq!(column_sql(ScopeColumn::Name), "entry_value");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }
}
