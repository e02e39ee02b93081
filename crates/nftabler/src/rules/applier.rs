//! Applies a single rule file through the engine.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::rules::engine::RuleEngine;

/// Result of applying one rule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// The rule file as found during the scan.
    pub path: PathBuf,
    /// Whether the engine accepted the file.
    pub success: bool,
    /// Engine output on failure, empty on success.
    pub diagnostic: String,
}

impl ApplyOutcome {
    fn applied(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            success: true,
            diagnostic: String::new(),
        }
    }

    fn failed(path: &Path, diagnostic: String) -> Self {
        Self {
            path: path.to_path_buf(),
            success: false,
            diagnostic,
        }
    }
}

/// Hands rule files to a [`RuleEngine`] and turns the result into an outcome.
#[derive(Clone)]
pub struct RulesetApplier {
    engine: Arc<dyn RuleEngine>,
}

impl RulesetApplier {
    /// Creates an applier that loads every file through `engine`.
    pub fn new(engine: Arc<dyn RuleEngine>) -> Self {
        Self { engine }
    }

    pub fn apply(&self, path: &Path) -> ApplyOutcome {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return ApplyOutcome::failed(path, format!("read error: {}", e)),
        };

        debug!("Loading {} into engine", path.display());

        match self.engine.load(file) {
            Ok(output) if output.success => {
                info!("Applied {} successfully", display_name(path));
                ApplyOutcome::applied(path)
            }
            Ok(output) => {
                let status = match output.code {
                    Some(code) => format!("exit status {}", code),
                    None => "terminated by signal".to_string(),
                };
                ApplyOutcome::failed(
                    path,
                    format!("nft error: {}, output: {}", status, output.output),
                )
            }
            Err(e) => ApplyOutcome::failed(path, format!("engine error: {}", e)),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
