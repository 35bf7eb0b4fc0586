use tracing_subscriber::{prelude::*, EnvFilter};

/// Filter directives are read from this variable, `RUST_LOG` syntax.
pub const LOG_ENV: &str = "ECSNV_LOG";

// Logs go to stderr so that `KEY=VALUE` lines on stdout stay pipeable.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}
