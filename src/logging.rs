use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Install the global subscriber. `RUST_LOG` wins over the screen level.
pub fn init_tracing(screen: LogLevel, colors: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(screen.filter().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(colors)
        .with_target(false)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}
