use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INSTALL: Once = Once::new();

/// Installs a global `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Calling it again, or after another subscriber was installed, does nothing.
pub fn init_tracing() {
    INSTALL.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .compact();

        // Someone else may own the global subscriber already; theirs wins.
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}
