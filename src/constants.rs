//! # System Constants
//!
//! Shared constants for the scope storage engine. These values define the
//! reserved vocabulary of the backing table and the defaults used when no
//! configuration is supplied.

/// Reserved record key that marks a row as a scope identity record.
///
/// A row with this key and [`EntryType::Scope`](crate::models::EntryType::Scope)
/// declares the existence of a scope; the row id doubles as the scope id and
/// the row value holds the scope name. User records are written with
/// [`EntryType::Value`](crate::models::EntryType::Value), so a user key equal
/// to this string can never collide with an identity record.
pub const SCOPE_KEY: &str = "__scope__";

/// Separator used when addressing nested scopes by path, as in `"a/b/c"`.
pub const PATH_SEPARATOR: char = '/';

/// Default name of the backing table.
pub const DEFAULT_TABLE: &str = "scope_entries";

/// Default connection pool size for the PostgreSQL backend.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default timeout in seconds when acquiring a pooled connection.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default database URL used when none is configured.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/scopestore_development";

/// Environment variable consulted by [`StoreConfig::from_env`](crate::config::StoreConfig::from_env)
/// for the database URL. Falls back to `DATABASE_URL` when unset.
pub const ENV_DATABASE_URL: &str = "SCOPESTORE_DATABASE_URL";

/// Environment variable controlling the log filter, e.g. `scopestore=debug`.
pub const ENV_LOG_FILTER: &str = "SCOPESTORE_LOG";

/// Environment variable selecting the log output format (`json` or `pretty`).
pub const ENV_LOG_FORMAT: &str = "SCOPESTORE_LOG_FORMAT";
