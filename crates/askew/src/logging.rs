#![forbid(unsafe_code)]

//! `tracing` subscriber bootstrap.
//!
//! Controls emit structured events with a `control` field: `debug` for
//! commits and timer effects, `trace` for ignored interactions, `warn` for
//! configuration fallbacks. Hosts that want to see them call [`init`] once.
//!
//! The filter is read from `ASKEW_LOG` (same syntax as `RUST_LOG`) and falls
//! back to the directive passed in.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::{SubscriberInitExt as _, TryInitError};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "ASKEW_LOG";

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line events.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Filter from `ASKEW_LOG`, or `fallback` when unset or unparsable.
#[must_use]
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install a global subscriber writing to stderr.
///
/// Fails if a global subscriber is already installed.
pub fn init(format: LogFormat) -> Result<(), TryInitError> {
    let filter = env_filter("warn");
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_directive_is_used_without_env() {
        // ASKEW_LOG is not set in the test environment
        if std::env::var_os(LOG_ENV).is_none() {
            assert_eq!(
                env_filter("debug").max_level_hint(),
                Some(tracing::level_filters::LevelFilter::DEBUG)
            );
        }
    }

    #[test]
    fn default_format_is_compact() {
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }
}
