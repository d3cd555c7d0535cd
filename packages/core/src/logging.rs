use tracing_subscriber::{fmt, EnvFilter};

/// Initialize structured logging. Called once at startup, before any other
/// work; the filter honours `RUST_LOG` and defaults to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    tracing::info!("Logging initialized");
}
