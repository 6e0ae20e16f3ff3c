#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Scopestore
//!
//! Hierarchical scoped key-value storage engine with guarded recursive
//! deletion, built on PostgreSQL.
//!
//! ## Overview
//!
//! Scopestore keeps a tree of named **scopes** over a single relational
//! table. Each scope owns plain key/value **records** and any number of
//! child scopes; the implicit root sits above them all without a backing
//! row. Scopes are addressed by `/`-separated paths and queried through a
//! builder that narrows candidates in stages: identity constraints first,
//! then per-key record constraints, then ordering and limits.
//!
//! Deletion runs through the same narrowing pipeline and adds two explicit
//! opt-ins: `allow_bulk()` for deletions with no constraints at all, and
//! `allow_recursion()` to take whole subtrees instead of a single level.
//!
//! ## Key Features
//!
//! - **Single-table layout**: scopes and records share one configurable
//!   PostgreSQL table, no joins or foreign keys required
//! - **Staged queries**: every fetch observes one transaction snapshot
//!   across all stages
//! - **Typed predicates**: equality, ranges, membership, and `LIKE`
//!   patterns with identical semantics in SQL and in memory
//! - **Guarded deletion**: unconstrained and recursive deletions both
//!   require explicit opt-in before any row is touched
//! - **Pluggable backends**: PostgreSQL for production, an in-memory
//!   snapshot backend for tests and embedded development
//!
//! ## Module Organization
//!
//! - [`store`] - Store facade and scope handles
//! - [`executors`] - Query, deletion, and mutation executors
//! - [`query`] - Predicates, filters, ordering, and limits
//! - [`backend`] - Storage capability traits and both backends
//! - [`models`] - Scope and record row models
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Tracing initialization
//!
//! ## Quick Start
//!
//! ```rust
//! use scopestore::{Predicate, ScopeStore, SortDirection, StoreResult};
//!
//! # #[tokio::main]
//! # async fn main() -> StoreResult<()> {
//! let store = ScopeStore::in_memory();
//!
//! store.root().create_scope("jobs").await?;
//! store.within("jobs").create_scope("nightly").await?;
//! store.within("jobs").create_scope("hourly").await?;
//! store.within("jobs/nightly").set_value("owner", "ops").await?;
//!
//! let scopes = store
//!     .within("jobs")
//!     .query_scopes()
//!     .where_record("owner", Predicate::Equal("ops".to_string()))
//!     .order_by_scope_name(SortDirection::Asc)
//!     .fetch()
//!     .await?;
//! assert_eq!(scopes.names(), vec!["nightly"]);
//!
//! // Deleting without constraints requires an explicit opt-in.
//! let refused = store.within("jobs").delete_scopes().execute().await;
//! assert!(refused.is_err());
//! let removed = store
//!     .within("jobs")
//!     .delete_scopes()
//!     .allow_bulk()
//!     .allow_recursion()
//!     .execute()
//!     .await?;
//! assert!(removed > 0);
//! # Ok(())
//! # }
//! ```
//!
//! Against PostgreSQL the same API applies; connect with
//! [`ScopeStore::connect`] and a [`StoreConfig`], typically built from
//! `SCOPESTORE_*` environment variables via [`StoreConfig::from_env`].

pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod executors;
pub mod logging;
pub mod models;
pub mod query;
pub mod store;

pub use backend::{MemoryBackend, PgBackend, StoreBackend, StoreTransaction};
pub use config::{DatabaseConfig, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use executors::{ScopeDeletionExecutor, ScopeQueryExecutor, ScopeSelector};
pub use logging::init_logging;
pub use models::{EntryType, Scope, Scopes, StoreEntry};
pub use query::{
    LimitClause, OrderBy, OrderCriteria, Predicate, ScopeColumn, ScopeFilter, SortDirection,
};
pub use store::{ScopeHandle, ScopeStore};
