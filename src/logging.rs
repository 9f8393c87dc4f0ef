use tracing_subscriber::{fmt, EnvFilter};

/// Initializes logging.
///
/// Level comes from `RUST_LOG` (default `info`), e.g.
/// `RUST_LOG=availability_digest=debug` to see day flushes.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Logging for tests, routed through the test writer
#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
