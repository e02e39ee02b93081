//! nftabler: keeps the live nftables ruleset in sync with a rules directory.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

use nftabler::config::{resolve_config, Config, ConfigOverrides, LogFormat};
use nftabler::daemon::{self, RunMode};
use nftabler::{logging, shutdown, NftEngine, ReconcileLoop, Result};

/// Watches a directory of nftables rule files and re-applies them on change.
#[derive(Parser, Debug)]
#[command(name = "nftabler", version, about)]
struct Cli {
    /// Path to a JSON config file.
    #[arg(long, env = "NFTABLER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing rule files.
    #[arg(long, env = "NFTABLER_RULES_DIR")]
    rules_dir: Option<PathBuf>,

    /// Path to the nft binary.
    #[arg(long, env = "NFTABLER_NFT_BINARY")]
    nft_binary: Option<PathBuf>,

    /// Extension of rule files, without the dot.
    #[arg(long, env = "NFTABLER_EXTENSION")]
    extension: Option<String>,

    /// Quiet period after a change before reconciling, in milliseconds.
    #[arg(long, env = "NFTABLER_DEBOUNCE_MS")]
    debounce_ms: Option<u64>,

    /// Only check rule files (`nft -c`); never change the live ruleset.
    #[arg(long, env = "NFTABLER_DRY_RUN")]
    dry_run: bool,

    /// Apply the directory once and exit.
    #[arg(long)]
    once: bool,

    /// Log level or filter directives. `RUST_LOG` takes precedence.
    #[arg(long, env = "NFTABLER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format.
    #[arg(long, env = "NFTABLER_LOG_FORMAT", value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            rules_dir: self.rules_dir.clone(),
            nft_binary: self.nft_binary.clone(),
            rule_extension: self.extension.clone(),
            debounce_ms: self.debounce_ms,
            dry_run: self.dry_run,
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }

    fn mode(&self) -> RunMode {
        if self.once {
            RunMode::Once
        } else {
            RunMode::Watch
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("nftabler: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("nftabler: {}", e);
        return ExitCode::FAILURE;
    }

    match run(config, cli.mode()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, mode: RunMode) -> Result<()> {
    info!(
        "Starting nftabler v{} (rules: {}, engine: {}{})",
        env!("CARGO_PKG_VERSION"),
        config.rules_dir.display(),
        config.nft_binary.display(),
        if config.dry_run { ", dry run" } else { "" }
    );

    // Installed before anything touches the ruleset so a signal during the
    // startup reconcile drains instead of killing the process.
    let (trigger, listener) = shutdown::channel();
    ctrlc::set_handler(move || {
        info!("Received termination signal");
        trigger.trigger();
    })?;

    let engine = Arc::new(NftEngine::from_config(&config));
    let reconcile_loop = ReconcileLoop::from_config(&config, engine);

    daemon::run(&reconcile_loop, mode, listener).await?;
    Ok(())
}
