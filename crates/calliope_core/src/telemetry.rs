//! Tracing subscriber setup.

use calliope_error::{CalliopeResult, ConfigError};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber for human-readable logs.
///
/// The subscriber respects the `RUST_LOG` environment variable for filtering.
/// Call once at startup; a second call fails because a global subscriber is
/// already installed.
///
/// # Errors
///
/// Returns an error if subscriber initialization fails.
pub fn init_telemetry() -> CalliopeResult<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}
