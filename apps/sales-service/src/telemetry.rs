//! # Telemetry
//!
//! Installs the global tracing subscriber.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages (wins over `log.level`)
//! - `RUST_LOG=tally_db=trace` - Trace the database layer only
//! - Default: `log.level` from [`LogConfig`], `info` unless configured

use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};

/// Builds the filter: `RUST_LOG` if set and valid, otherwise `config.level`.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes the tracing subscriber for structured logging.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing(config: &LogConfig) {
    let filter = env_filter(config);
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::default();
        init_tracing(&config);
        init_tracing(&LogConfig {
            format: LogFormat::Pretty,
            ..config
        });
    }
}
