//! Log sink setup for the daemon.
//!
//! Library code logs through the `log` facade; records are bridged into a
//! `tracing` subscriber so `RUST_LOG` filtering and JSON output apply to both.

use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};
use crate::error::{NftablerError, Result};

/// Builds the filter: `RUST_LOG` when set, otherwise the configured level.
pub fn env_filter(config: &LogConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| NftablerError::Logging(format!("invalid log level '{}': {}", config.level, e)))
}

/// Installs the global subscriber. Call once, before anything logs.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = env_filter(config)?;

    tracing_log::LogTracer::init().map_err(|e| NftablerError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match config.format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };

    installed.map_err(|e| NftablerError::Logging(e.to_string()))
}
