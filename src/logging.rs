//! Log output for the binaries.
//!
//! The library logs through the `log` facade. [`init_logging`] installs a
//! `tracing-subscriber` fmt subscriber that picks those records up via
//! its `log` bridge, filtered by `RUST_LOG` (default `info`).

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_thread_names(true))
            .init();
    });
}
