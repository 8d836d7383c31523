use tracing_subscriber::EnvFilter;

/// Initialize diagnostics on stderr, keeping stdout for engine output.
///
/// Uses RUST_LOG if set, otherwise defaults to INFO.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
