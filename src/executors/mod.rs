//! # Execution Engine
//!
//! Resolution, querying, mutation, and deletion of scopes. Executors are
//! by-value builders handed out by [`ScopeHandle`](crate::store::ScopeHandle);
//! each terminal method opens one transaction, resolves the selector inside
//! it, runs its stages, and commits.

pub(crate) mod creation;
pub mod deletion;
pub(crate) mod pipeline;
pub mod query;
pub mod resolver;
pub(crate) mod values;

pub use deletion::ScopeDeletionExecutor;
pub use query::ScopeQueryExecutor;
pub use resolver::ScopeSelector;
