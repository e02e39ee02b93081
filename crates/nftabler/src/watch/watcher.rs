//! File system watcher for the rules directory.

use std::path::{Path, PathBuf};

use log::{info, warn};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::event::{ChangeEvent, WatchMessage};
use crate::error::WatchError;

/// Owned handle over the OS watch on the rules directory.
///
/// Only the top level is watched. Rule files in subdirectories are still
/// applied by every reconcile, but creating or editing them does not by
/// itself trigger one. The watch is removed when the handle is dropped.
pub struct RuleWatcher {
    rules_dir: PathBuf,
    watcher: RecommendedWatcher,
}

impl RuleWatcher {
    /// Registers the watch and returns the handle with its event stream.
    pub fn start(
        rules_dir: impl Into<PathBuf>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<WatchMessage>), WatchError> {
        let rules_dir = rules_dir.into();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    for change in ChangeEvent::from_notify(event) {
                        let _ = tx.send(Ok(change));
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                }
            },
        )
        .map_err(WatchError::Init)?;

        watcher
            .watch(&rules_dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Register {
                path: rules_dir.clone(),
                source: e,
            })?;

        info!("Started watching rules directory: {}", rules_dir.display());

        Ok((Self { rules_dir, watcher }, rx))
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }
}

impl Drop for RuleWatcher {
    fn drop(&mut self) {
        if let Err(e) = self.watcher.unwatch(&self.rules_dir) {
            // The directory may already be gone.
            warn!("Failed to remove watch on {}: {}", self.rules_dir.display(), e);
        }
        info!("Stopped watching rules directory");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::ChangeKind;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_start_on_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        match RuleWatcher::start(&missing) {
            Err(WatchError::Register { path, .. }) => assert_eq!(path, missing),
            Err(other) => panic!("expected Register error, got {:?}", other),
            Ok(_) => panic!("watching a missing directory should fail"),
        }
    }

    #[tokio::test]
    async fn test_reports_created_file() {
        let dir = TempDir::new().unwrap();
        let (watcher, mut rx) = RuleWatcher::start(dir.path()).unwrap();
        assert_eq!(watcher.rules_dir(), dir.path());

        let path = dir.path().join("new.nft");
        std::fs::write(&path, "table inet t {}").unwrap();

        let seen = tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(message) = rx.recv().await {
                if let Ok(event) = message {
                    if event.path.file_name() == path.file_name()
                        && event.kind.triggers_reconcile()
                    {
                        return Some(event.kind);
                    }
                }
            }
            None
        })
        .await
        .unwrap();

        assert!(matches!(
            seen,
            Some(ChangeKind::Created) | Some(ChangeKind::Written)
        ));
    }
}
