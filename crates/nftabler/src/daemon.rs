//! Process lifecycle: startup reconcile, watch, drain on shutdown.

use log::info;

use crate::error::Result;
use crate::reconcile::{LoopSummary, ReconcileLoop};
use crate::shutdown::ShutdownListener;
use crate::watch::RuleWatcher;

/// How long the daemon keeps running after the startup reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Apply the directory once and return.
    Once,
    /// Keep watching until shutdown is requested.
    Watch,
}

/// Runs the daemon to completion.
///
/// The shutdown listener must already be wired to the signal handler so a
/// signal during the startup reconcile is observed: the reconcile finishes
/// and is logged, then the daemon returns without registering the watch.
///
/// Errors are fatal startup failures (unreadable rules directory, watcher
/// initialization or registration). Everything after that is logged.
pub async fn run(
    reconcile_loop: &ReconcileLoop,
    mode: RunMode,
    shutdown: ShutdownListener,
) -> Result<LoopSummary> {
    reconcile_loop.startup().await?;

    if mode == RunMode::Once {
        info!("Startup reconcile complete, exiting");
        return Ok(LoopSummary::default());
    }
    if shutdown.is_triggered() {
        info!("Shutdown requested during startup reconcile");
        return Ok(LoopSummary::default());
    }

    let (watcher, events) = RuleWatcher::start(reconcile_loop.reconciler().rules_dir())?;
    let summary = reconcile_loop.run(events, shutdown).await;
    drop(watcher);

    info!(
        "Stopped after {} change-triggered reconcile(s)",
        summary.reconciles
    );
    Ok(summary)
}
