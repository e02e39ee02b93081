//! The watch → debounce → reconcile loop.

use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::mpsc;

use super::reconciler::{DirectoryReconciler, ReconcileReport};
use crate::config::Config;
use crate::error::ReconcileError;
use crate::rules::{RuleEngine, RuleFileSelector, RulesetApplier};
use crate::shutdown::ShutdownListener;
use crate::watch::{ChangeDebouncer, ReconcileTrigger, WatchMessage};

/// What the loop did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Change-triggered reconciles. The startup reconcile is not counted.
    pub reconciles: usize,
}

/// Owns the reconciler and debouncer and runs them for the daemon's lifetime.
pub struct ReconcileLoop {
    reconciler: DirectoryReconciler,
    debouncer: ChangeDebouncer,
}

impl ReconcileLoop {
    /// Creates a loop from already-built parts.
    pub fn new(reconciler: DirectoryReconciler, debouncer: ChangeDebouncer) -> Self {
        Self {
            reconciler,
            debouncer,
        }
    }

    /// Wires the whole pipeline from config around the given engine.
    pub fn from_config(config: &Config, engine: Arc<dyn RuleEngine>) -> Self {
        Self::new(
            DirectoryReconciler::new(
                &config.rules_dir,
                RuleFileSelector::new(&config.rule_extension),
                RulesetApplier::new(engine),
            ),
            ChangeDebouncer::new(config.debounce_window()),
        )
    }

    /// The reconciler; its rules directory is what the watcher registers.
    pub fn reconciler(&self) -> &DirectoryReconciler {
        &self.reconciler
    }

    /// Runs the unconditional startup reconcile.
    ///
    /// An unreadable rules directory here is fatal for the caller; there is
    /// no ruleset worth running with.
    pub async fn startup(&self) -> Result<ReconcileReport, ReconcileError> {
        let report = self.reconcile_once().await?;
        report.log(self.reconciler.rules_dir());
        Ok(report)
    }

    /// Reconciles on every settled change until shutdown is requested or the
    /// event stream closes.
    ///
    /// Only one reconcile runs at a time and it is never interrupted: shutdown
    /// is observed between iterations, so an in-flight reconcile finishes and
    /// is logged first.
    pub async fn run(
        &self,
        events: mpsc::UnboundedReceiver<WatchMessage>,
        mut shutdown: ShutdownListener,
    ) -> LoopSummary {
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<ReconcileTrigger>(1);
        let (error_tx, mut error_rx) = mpsc::unbounded_channel::<notify::Error>();

        let debounce = tokio::spawn(self.debouncer.clone().run(
            events,
            trigger_tx,
            error_tx,
            shutdown.clone(),
        ));

        let mut summary = LoopSummary::default();

        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    info!("Shutting down");
                    break;
                }
                Some(e) = error_rx.recv() => {
                    warn!("Watcher error: {}", e);
                }
                trigger = trigger_rx.recv() => {
                    if trigger.is_none() {
                        warn!("Change stream closed, stopping reconcile loop");
                        break;
                    }
                    summary.reconciles += 1;
                    match self.reconcile_once().await {
                        Ok(report) => report.log(self.reconciler.rules_dir()),
                        Err(e) => error!("Reconcile failed: {}", e),
                    }
                }
            }
        }

        debounce.abort();
        let _ = debounce.await;

        summary
    }

    async fn reconcile_once(&self) -> Result<ReconcileReport, ReconcileError> {
        let reconciler = self.reconciler.clone();
        tokio::task::spawn_blocking(move || reconciler.reconcile())
            .await
            .map_err(|e| ReconcileError::TaskFailed(e.to_string()))?
    }
}
