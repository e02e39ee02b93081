use std::path::Path;

use crate::config::schema::{Config, ConfigOverrides};
use crate::error::ConfigError;

const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Loads and validates a config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config = read_config(path.as_ref())?;

    validate_config(&config)?;

    Ok(config)
}

/// Parses and validates config JSON.
pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Builds the effective config: defaults, then the optional file, then
/// overrides. Only the merged result is validated, so an override can repair
/// a bad file value.
pub fn resolve_config(
    file: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    let mut config = match file {
        Some(path) => read_config(path)?,
        None => Config::default(),
    };

    config.apply_overrides(overrides);
    validate_config(&config)?;

    Ok(config)
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(serde_json::from_str(&content)?)
}

/// Checks a fully merged config. Called again after CLI overrides are applied.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.rules_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "rules_dir must not be empty".to_string(),
        });
    }

    if config.nft_binary.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "nft_binary must not be empty".to_string(),
        });
    }

    let ext = &config.rule_extension;
    if ext.is_empty() {
        return Err(ConfigError::Validation {
            message: "rule_extension must not be empty".to_string(),
        });
    }
    if ext.starts_with('.') || ext.contains('/') || ext.contains('\\') {
        return Err(ConfigError::Validation {
            message: format!(
                "rule_extension '{}' must be a bare extension such as 'nft'",
                ext
            ),
        });
    }

    if config.debounce_ms == 0 || config.debounce_ms > MAX_DEBOUNCE_MS {
        return Err(ConfigError::Validation {
            message: format!(
                "debounce_ms must be between 1 and {}, got {}",
                MAX_DEBOUNCE_MS, config.debounce_ms
            ),
        });
    }

    Ok(())
}
