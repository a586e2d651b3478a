//! Diagnostic logging setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Verbosity;

/// Log filter for a verbosity level; `RUST_LOG` takes precedence when set.
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()))
}

/// Install the stderr subscriber. A second call is a no-op.
pub fn init_tracing(verbosity: Verbosity, use_color: bool) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_color)
                .with_target(false),
        )
        .with(env_filter(verbosity))
        .try_init();
}
