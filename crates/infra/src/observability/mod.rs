//! Logging setup
//!
//! Library code only emits `tracing` events. Binaries and tests that want to
//! see them call [`init_logging`] once at startup.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_DIRECTIVE: &str = "rocketfuel_infra=info";

/// Install a fmt subscriber filtered by `RUST_LOG`, or by
/// `default_directive` when `RUST_LOG` is unset or invalid.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init_logging(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
}

/// Same as [`init_logging`] but emits one JSON object per event.
pub fn init_json_logging(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt().json().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_does_not_panic() {
        init_logging(DEFAULT_LOG_DIRECTIVE);
        init_logging("debug");
        init_json_logging(DEFAULT_LOG_DIRECTIVE);
        tracing::info!("still logging");
    }
}
