//! Turns bursts of change events into reconcile triggers.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::event::{ChangeEvent, WatchMessage};
use crate::shutdown::ShutdownListener;

/// Signal to re-derive the ruleset from the rules directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileTrigger;

/// Waits out a quiet period after each relevant change and only triggers a
/// reconcile if something it saw still exists afterwards.
#[derive(Debug, Clone)]
pub struct ChangeDebouncer {
    window: Duration,
}

impl ChangeDebouncer {
    /// `window` should span a write-temp-then-rename update.
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Consumes the event stream until it closes or shutdown is requested.
    ///
    /// Triggers go to a bounded channel; when one is already queued the new
    /// one is dropped, since the queued reconcile will see the same state.
    /// Watcher errors are forwarded untouched.
    pub async fn run(
        self,
        mut events: mpsc::UnboundedReceiver<WatchMessage>,
        triggers: mpsc::Sender<ReconcileTrigger>,
        errors: mpsc::UnboundedSender<notify::Error>,
        mut shutdown: ShutdownListener,
    ) {
        loop {
            let message = tokio::select! {
                _ = shutdown.wait() => break,
                message = events.recv() => match message {
                    Some(message) => message,
                    None => break,
                },
            };

            let event = match message {
                Ok(event) => event,
                Err(e) => {
                    let _ = errors.send(e);
                    continue;
                }
            };

            if !event.kind.triggers_reconcile() {
                debug!("Ignoring {:?} on {}", event.kind, event.path.display());
                continue;
            }

            // Pending confirmation: everything relevant that arrives during
            // the window belongs to the same update.
            let mut pending = vec![event.path];
            tokio::select! {
                _ = shutdown.wait() => break,
                _ = tokio::time::sleep(self.window) => {}
            }
            while let Ok(message) = events.try_recv() {
                match message {
                    Ok(ChangeEvent { path, kind }) if kind.triggers_reconcile() => {
                        if !pending.contains(&path) {
                            pending.push(path);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        let _ = errors.send(e);
                    }
                }
            }

            if !any_exists(&pending).await {
                debug!("Changed paths vanished before settling: {:?}", pending);
                continue;
            }

            match triggers.try_send(ReconcileTrigger) {
                Ok(()) => debug!("Change settled, reconcile triggered"),
                Err(TrySendError::Full(_)) => debug!("Reconcile already queued"),
                Err(TrySendError::Closed(_)) => break,
            }
        }
    }
}

async fn any_exists(paths: &[PathBuf]) -> bool {
    for path in paths {
        if exists(path).await {
            return true;
        }
    }
    false
}

async fn exists(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(_) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!("stat {}: {}", path.display(), e);
            false
        }
    }
}
