use std::io;

use tracing_subscriber::{fmt, EnvFilter};

/// Diagnostics go to stderr so the report on stdout stays clean.
///
/// The level comes from `RUST_LOG` and defaults to `warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
