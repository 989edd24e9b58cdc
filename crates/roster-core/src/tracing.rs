use tracing_subscriber::EnvFilter;

/// Initialize structured JSON tracing on stdout, filtered by the `RUST_LOG`
/// env var. Call once at process startup.
///
/// Safe to call multiple times — subsequent calls are silently ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
