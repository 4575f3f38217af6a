//! Logging and tracing setup
//!
//! Installs a global `tracing-subscriber` registry with an `EnvFilter`.
//! `RUST_LOG`, when set, overrides the configured level.

use songlink_domain::{LogFormat, LoggingConfig, Result, SongLinkError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter from `RUST_LOG`, else from `config.level`
///
/// # Errors
/// Returns `Config` if the configured directive does not parse
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            SongLinkError::Config(format!("Invalid log level '{}': {e}", config.level))
        }),
    }
}

/// Install the global subscriber
///
/// Log lines go to stderr so command output on stdout stays clean.
///
/// # Errors
/// Returns `Config` for an invalid level, `Internal` if a subscriber is
/// already installed
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_line_number(true))
            .try_init(),
        LogFormat::Json => {
            registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()
        }
    };

    result.map_err(|e| SongLinkError::Internal(format!("Failed to install tracing subscriber: {e}")))
}
