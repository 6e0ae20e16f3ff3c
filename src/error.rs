//! # Store Error Types
//!
//! Structured error handling for the scope storage engine using thiserror
//! for typed variants instead of `Box<dyn Error>` patterns.

use thiserror::Error;

/// Errors surfaced by scope resolution, querying, mutation, and deletion.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Scope not found: {path}")]
    MissingScope { path: String },

    #[error("Bulk deletion rejected under '{path}': no constraints and allow_bulk not set")]
    BulkDeletionDisallowed { path: String },

    #[error("Scope already exists: {name}")]
    DuplicateScope { name: String },

    #[error("Invalid scope name: {name}: {reason}")]
    InvalidScopeName { name: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    #[error("Database query error: {operation}: {message}")]
    DatabaseQuery { operation: String, message: String },

    #[error("Connection pool exhausted: {message}")]
    PoolExhausted { message: String },

    #[error("Internal store error: {message}")]
    Internal { message: String },
}

impl StoreError {
    /// Create a missing scope error from the path that failed to resolve
    pub fn missing_scope(path: impl Into<String>) -> Self {
        Self::MissingScope { path: path.into() }
    }

    /// Create a bulk deletion rejection for an unconstrained deletion
    pub fn bulk_deletion_disallowed(path: impl Into<String>) -> Self {
        Self::BulkDeletionDisallowed { path: path.into() }
    }

    /// Create a duplicate scope error
    pub fn duplicate_scope(name: impl Into<String>) -> Self {
        Self::DuplicateScope { name: name.into() }
    }

    /// Create an invalid scope name error
    pub fn invalid_scope_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidScopeName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a database connection error
    pub fn database_connection(message: impl Into<String>) -> Self {
        Self::DatabaseConnection {
            message: message.into(),
        }
    }

    /// Create a database query error
    pub fn database_query(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DatabaseQuery {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a pool exhausted error
    pub fn pool_exhausted(message: impl Into<String>) -> Self {
        Self::PoolExhausted {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True when the error indicates a scope path that did not resolve
    pub fn is_missing_scope(&self) -> bool {
        matches!(self, Self::MissingScope { .. })
    }
}

/// Conversion from sqlx::Error to StoreError
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::database_query("query", "No rows found"),
            sqlx::Error::Database(db_err) => {
                StoreError::database_query("database", db_err.to_string())
            }
            sqlx::Error::PoolTimedOut => {
                StoreError::pool_exhausted("Timed out acquiring a database connection")
            }
            sqlx::Error::PoolClosed => StoreError::pool_exhausted("Database pool is closed"),
            sqlx::Error::Configuration(config_err) => {
                StoreError::configuration(config_err.to_string())
            }
            _ => StoreError::database_connection(err.to_string()),
        }
    }
}

/// Conversion from String to StoreError
impl From<String> for StoreError {
    fn from(message: String) -> Self {
        StoreError::internal(message)
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_creation() {
        let missing = StoreError::missing_scope("a/b/c");
        assert!(matches!(missing, StoreError::MissingScope { .. }));
        assert!(missing.is_missing_scope());

        let bulk = StoreError::bulk_deletion_disallowed("jobs");
        assert!(matches!(bulk, StoreError::BulkDeletionDisallowed { .. }));
        assert!(!bulk.is_missing_scope());

        let dup = StoreError::duplicate_scope("nightly");
        assert!(matches!(dup, StoreError::DuplicateScope { .. }));
    }

    #[test]
    fn test_error_conversions() {
        let sqlx_err = sqlx::Error::PoolTimedOut;
        let store_err: StoreError = sqlx_err.into();
        assert!(matches!(store_err, StoreError::PoolExhausted { .. }));

        let sqlx_err = sqlx::Error::RowNotFound;
        let store_err: StoreError = sqlx_err.into();
        assert!(matches!(store_err, StoreError::DatabaseQuery { .. }));

        let store_err: StoreError = String::from("boom").into();
        assert!(matches!(store_err, StoreError::Internal { .. }));
    }

    #[test]
    fn test_error_display() {
        let missing = StoreError::missing_scope("teams/blue/ghost");
        let display_str = format!("{missing}");
        assert!(display_str.contains("Scope not found"));
        assert!(display_str.contains("teams/blue/ghost"));

        let bulk = StoreError::bulk_deletion_disallowed("teams");
        let display_str = format!("{bulk}");
        assert!(display_str.contains("allow_bulk"));
        assert!(display_str.contains("teams"));

        let invalid = StoreError::invalid_scope_name("a/b", "must not contain '/'");
        let display_str = format!("{invalid}");
        assert!(display_str.contains("Invalid scope name"));
        assert!(display_str.contains("a/b"));
    }
}
