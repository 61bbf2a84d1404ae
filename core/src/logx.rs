use tracing_subscriber::{fmt, EnvFilter};

/// Initialize `tracing` once, writing to stderr so stdout stays free for the
/// status line. Respects `RUST_LOG`; falls back to `default_level`.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
