//! Log output setup for the command-line front end.

use tracing::Level;

#[cfg(feature = "cli")]
use crate::config::LoggingConfig;

/// Parse a configured level name, defaulting to `info`.
pub fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

/// Install the global `fmt` subscriber when logging is enabled.
///
/// A `verbose` flag enables logging at `debug` regardless of configuration.
/// Installing twice is a no-op.
#[cfg(feature = "cli")]
pub fn init_logging(config: &LoggingConfig, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if config.enabled {
        parse_level(&config.level)
    } else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
