//! Full directory reconcile: scan, select, apply.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::ReconcileError;
use crate::rules::{ApplyOutcome, RuleFileSelector, RulesetApplier, Selection};

/// Everything one reconcile attempted, in scan order.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// One outcome per rule file handed to the engine.
    pub outcomes: Vec<ApplyOutcome>,
    /// Files found that do not carry the rule extension.
    pub invalid: Vec<PathBuf>,
}

impl ReconcileReport {
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success).count()
    }

    pub fn applied_paths(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| o.success)
            .map(|o| o.path.as_path())
            .collect()
    }

    /// Writes per-file failures and a one-line summary to the log.
    pub fn log(&self, rules_dir: &Path) {
        for outcome in self.outcomes.iter().filter(|o| !o.success) {
            warn!(
                "Failed to apply {}: {}",
                outcome.path.display(),
                outcome.diagnostic
            );
        }

        info!(
            "Reconciled {}: {} applied, {} failed, {} ignored",
            rules_dir.display(),
            self.applied(),
            self.failed(),
            self.invalid.len()
        );
    }
}

/// Re-derives the live ruleset from the rules directory.
///
/// Nothing is cached between calls, so every reconcile reflects what is on
/// disk at the moment the directory is enumerated.
#[derive(Clone)]
pub struct DirectoryReconciler {
    rules_dir: PathBuf,
    selector: RuleFileSelector,
    applier: RulesetApplier,
}

impl DirectoryReconciler {
    /// Creates a reconciler over `rules_dir`. The directory is not touched
    /// until [`reconcile`](Self::reconcile) runs.
    pub fn new(
        rules_dir: impl Into<PathBuf>,
        selector: RuleFileSelector,
        applier: RulesetApplier,
    ) -> Self {
        Self {
            rules_dir: rules_dir.into(),
            selector,
            applier,
        }
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Applies every rule file under the rules directory.
    ///
    /// Only a failure to read the root itself aborts the reconcile. Unreadable
    /// nested entries and per-file engine failures are reported and skipped.
    pub fn reconcile(&self) -> Result<ReconcileReport, ReconcileError> {
        let mut report = ReconcileReport::default();

        for entry in WalkDir::new(&self.rules_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ReconcileError::ReadDirectory {
                        path: self.rules_dir.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            match self.selector.select_entry(&entry) {
                Selection::Skip => {}
                Selection::Apply => report.outcomes.push(self.applier.apply(entry.path())),
                Selection::Invalid(path) => {
                    debug!("Checked path is not a rule file: {}", path.display());
                    report.invalid.push(path);
                }
            }
        }

        Ok(report)
    }
}
