use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Daemon settings, read from an optional JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory scanned (recursively) and watched (top level only).
    #[serde(default = "default_rules_dir")]
    pub rules_dir: PathBuf,
    /// Path to the `nft` executable.
    #[serde(default = "default_nft_binary")]
    pub nft_binary: PathBuf,
    /// Arguments passed to `nft`; the rule file arrives on stdin.
    #[serde(default = "default_nft_args")]
    pub nft_args: Vec<String>,
    /// Extension of rule files, without the leading dot.
    #[serde(default = "default_rule_extension")]
    pub rule_extension: String,
    /// Quiet period after a change before reconciling, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Run the engine in check mode (`nft -c`) so nothing is mutated.
    #[serde(default)]
    pub dry_run: bool,
    /// Log sink settings.
    #[serde(default)]
    pub log: LogConfig,
}

fn default_rules_dir() -> PathBuf {
    PathBuf::from("/etc/nftabler")
}

fn default_nft_binary() -> PathBuf {
    PathBuf::from("/usr/sbin/nft")
}

fn default_nft_args() -> Vec<String> {
    vec!["-f".to_string(), "-".to_string()]
}

fn default_rule_extension() -> String {
    "nft".to_string()
}

fn default_debounce_ms() -> u64 {
    100
}

impl Config {
    /// Returns the debounce window as a `Duration`.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Replaces every field for which an override is set.
    ///
    /// Does not validate; call `validate_config` on the result.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(dir) = &overrides.rules_dir {
            self.rules_dir = dir.clone();
        }
        if let Some(binary) = &overrides.nft_binary {
            self.nft_binary = binary.clone();
        }
        if let Some(ext) = &overrides.rule_extension {
            self.rule_extension = ext.clone();
        }
        if let Some(ms) = overrides.debounce_ms {
            self.debounce_ms = ms;
        }
        if overrides.dry_run {
            self.dry_run = true;
        }
        if let Some(level) = &overrides.log_level {
            self.log.level = level.clone();
        }
        if let Some(format) = overrides.log_format {
            self.log.format = format;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_dir: default_rules_dir(),
            nft_binary: default_nft_binary(),
            nft_args: default_nft_args(),
            rule_extension: default_rule_extension(),
            debounce_ms: default_debounce_ms(),
            dry_run: false,
            log: LogConfig::default(),
        }
    }
}

/// Values given on the command line or through the environment.
///
/// They take precedence over the config file, which takes precedence over
/// the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub rules_dir: Option<PathBuf>,
    pub nft_binary: Option<PathBuf>,
    pub rule_extension: Option<String>,
    pub debounce_ms: Option<u64>,
    /// Only ever switches dry run on; a flag cannot turn it off.
    pub dry_run: bool,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Level or `EnvFilter` directives, e.g. `info` or `nftabler=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}
