//! Logging setup for the `tagurl` binary.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber that writes to stderr, keeping stdout free
/// for the URLs the binary prints. The filter comes from `RUST_LOG` and
/// defaults to `warn`.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
