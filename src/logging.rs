//! Tracing subscriber setup for the `livequery` binary.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map the number of `-v` flags to a log level.
#[must_use]
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install a stderr fmt subscriber. `RUST_LOG` takes precedence over `level`.
///
/// Calling this more than once is harmless; later calls keep the first
/// subscriber.
pub fn initialize(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
