use tracing_subscriber::{fmt, EnvFilter};

/// Status lines own stdout, so diagnostics go to stderr and stay quiet unless `RUST_LOG` asks.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
