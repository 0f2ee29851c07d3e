//! Tracing subscriber setup
//!
//! Pagebind itself only emits `tracing` events. These helpers install a
//! subscriber for test binaries; `RUST_LOG` always takes precedence over the
//! default directive.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset; covers the core and the page crates
pub const DEFAULT_DIRECTIVE: &str = "pagebind=info,qa_pages=info";

/// Filter installed by [`init_test_logging`] when `RUST_LOG` is unset
pub const TEST_DIRECTIVE: &str = "pagebind=debug,qa_pages=debug";

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a global subscriber
///
/// Returns `false` when a subscriber was already installed.
pub fn init_logging(default_directive: &str, format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .with_target(true);
    match format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}

/// Install a subscriber that writes through the test harness's capture
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(TEST_DIRECTIVE))
        .with_test_writer()
        .try_init();
}
