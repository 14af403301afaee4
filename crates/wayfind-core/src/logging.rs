#![forbid(unsafe_code)]

//! Logging helpers.
//!
//! With the `tracing` feature the usual macros are re-exported so downstream
//! crates can write `wayfind_core::debug!`. With `subscriber`, a process-wide
//! fmt subscriber can be installed from the environment:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `WAYFIND_LOG` | `EnvFilter` directives | `warn` |
//! | `WAYFIND_LOG_JSON` | `1` to emit JSON lines (needs `tracing-json`) | off |

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, warn};

/// Environment variable holding the filter directives.
pub const ENV_LOG_FILTER: &str = "WAYFIND_LOG";

/// Environment variable switching to JSON output.
pub const ENV_LOG_JSON: &str = "WAYFIND_LOG_JSON";

/// Default directives when `WAYFIND_LOG` is unset or empty.
pub const DEFAULT_FILTER: &str = "warn";

/// Resolve the filter directives using a custom environment lookup.
#[must_use]
pub fn filter_from_env_with<F>(get_env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_env(ENV_LOG_FILTER)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install a global subscriber configured from the environment.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "subscriber")]
pub fn init_from_env() -> bool {
    use tracing_subscriber::EnvFilter;

    let directives = filter_from_env_with(|key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    #[cfg(feature = "tracing-json")]
    if std::env::var(ENV_LOG_JSON).is_ok_and(|v| v == "1") {
        return tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .is_ok();
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
