//! Tracing subscriber setup
//!
//! The library only emits `tracing` events; applications that want them on
//! stderr call [`init`] once at startup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs a fmt subscriber filtered by `RUST_LOG`, or by the configured
/// level when `RUST_LOG` is unset or invalid.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case nothing changes.
pub fn init(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
