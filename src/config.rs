//! # Store Configuration
//!
//! Environment-driven configuration for the storage engine. Defaults are
//! suitable for local development; every field can be overridden through
//! `SCOPESTORE_*` environment variables.

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS, DEFAULT_TABLE,
    ENV_DATABASE_URL,
};
use crate::error::{StoreError, StoreResult};

/// Connection settings for the PostgreSQL backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Top-level configuration for a [`ScopeStore`](crate::store::ScopeStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database: DatabaseConfig,
    /// Name of the backing table. Must be a plain SQL identifier.
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Build a configuration from environment variables, starting from defaults.
    ///
    /// Recognized variables:
    /// - `SCOPESTORE_DATABASE_URL` (falls back to `DATABASE_URL`)
    /// - `SCOPESTORE_MAX_CONNECTIONS`
    /// - `SCOPESTORE_CONNECT_TIMEOUT_SECS`
    /// - `SCOPESTORE_TABLE`
    pub fn from_env() -> StoreResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_DATABASE_URL) {
            config.database.url = url;
        } else if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        if let Ok(max_connections) = std::env::var("SCOPESTORE_MAX_CONNECTIONS") {
            config.database.max_connections = max_connections.parse().map_err(|e| {
                StoreError::configuration(format!("Invalid max_connections: {e}"))
            })?;
        }

        if let Ok(timeout) = std::env::var("SCOPESTORE_CONNECT_TIMEOUT_SECS") {
            config.database.connect_timeout_secs = timeout.parse().map_err(|e| {
                StoreError::configuration(format!("Invalid connect_timeout_secs: {e}"))
            })?;
        }

        if let Ok(table) = std::env::var("SCOPESTORE_TABLE") {
            config.table = table;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values a backend cannot operate with.
    pub fn validate(&self) -> StoreResult<()> {
        if self.database.url.is_empty() {
            return Err(StoreError::configuration("database url must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(StoreError::configuration("max_connections must be at least 1"));
        }
        if !is_valid_table_name(&self.table) {
            return Err(StoreError::configuration(format!(
                "table name '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                self.table
            )));
        }
        Ok(())
    }
}

/// Table names are interpolated into SQL text, so only plain identifiers
/// are accepted.
pub(crate) fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
