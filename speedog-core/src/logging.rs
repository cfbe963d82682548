use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize console logging.
///
/// - Log level comes from `RUST_LOG` (defaults to "info" if not set)
/// - Human-readable lines, colored only when stdout is a terminal
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stdout().is_terminal())
        .init();
}
