//! Structured logging initialization for Signet services.
//!
//! Log level is read from the `RUST_LOG` environment variable and defaults
//! to `info`. Output format is selected from [`LogConfig`](crate::LogConfig)
//! so the node binary can switch to JSON lines for log aggregation without
//! code changes.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// Initialize the global tracing subscriber.
///
/// Can only be called once per process; subsequent calls return an error
/// from the subscriber registry, which callers may ignore in tests.
///
/// # Example
/// ```no_run
/// use signet_core::config::LogConfig;
///
/// signet_core::logging::init(&LogConfig { json: false });
/// tracing::info!("service started");
/// ```
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
