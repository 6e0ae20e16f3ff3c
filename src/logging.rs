//! # Structured Logging Module
//!
//! Tracing-based logging for the storage engine. Output format and filter
//! are environment-driven so embedding applications can tune verbosity
//! without code changes.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::constants::{ENV_LOG_FILTER, ENV_LOG_FORMAT};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process.
///
/// The filter is read from `SCOPESTORE_LOG` (standard `EnvFilter` syntax,
/// default `info`); setting `SCOPESTORE_LOG_FORMAT=json` switches the
/// console output to JSON lines. Safe to call from multiple components;
/// an already-installed global subscriber is left in place.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = env_filter();

        // Use try_init to avoid panic if global subscriber already set
        let initialized = if json_output() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .json()
                        .with_filter(filter),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_filter(filter))
                .try_init()
        };

        if initialized.is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }
    });
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// True when `SCOPESTORE_LOG_FORMAT` selects JSON output
fn json_output() -> bool {
    std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logging();
        init_logging();
    }

    #[test]
    fn test_json_output_detection() {
        std::env::remove_var(ENV_LOG_FORMAT);
        assert!(!json_output());
        std::env::set_var(ENV_LOG_FORMAT, "JSON");
        assert!(json_output());
        std::env::set_var(ENV_LOG_FORMAT, "pretty");
        assert!(!json_output());
        std::env::remove_var(ENV_LOG_FORMAT);
    }
}
