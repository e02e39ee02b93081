//! Test harness for isolated reconcile runs.

#![allow(dead_code)]

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_fs::prelude::*;
use assert_fs::TempDir;

use nftabler::rules::EngineOutput;
use nftabler::{
    ChangeDebouncer, DirectoryReconciler, ReconcileLoop, RuleEngine, RuleFileSelector,
    RulesetApplier,
};

/// Payload marker that makes `RecordingEngine` report a failure.
pub const REJECT_MARKER: &str = "invalid syntax";

/// Records every payload; rejects payloads containing [`REJECT_MARKER`].
#[derive(Default)]
pub struct RecordingEngine {
    payloads: Mutex<Vec<String>>,
    started: AtomicUsize,
    finished: AtomicUsize,
    delay: Option<Duration>,
}

impl RecordingEngine {
    /// An engine that takes `delay` to load each file.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl RuleEngine for RecordingEngine {
    fn load(&self, mut rules: File) -> io::Result<EngineOutput> {
        self.started.fetch_add(1, Ordering::SeqCst);

        let mut payload = String::new();
        rules.read_to_string(&mut payload)?;
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let success = !payload.contains(REJECT_MARKER);
        self.payloads.lock().unwrap().push(payload);
        self.finished.fetch_add(1, Ordering::SeqCst);

        Ok(EngineOutput {
            success,
            code: Some(if success { 0 } else { 1 }),
            output: if success {
                String::new()
            } else {
                format!("Error: {}", REJECT_MARKER)
            },
        })
    }
}

/// Isolated rules directory plus helpers to build the pipeline over it.
pub struct TestHarness {
    temp_dir: TempDir,
    pub extension: String,
}

impl TestHarness {
    /// A harness whose rule files use the `rule` extension.
    pub fn new() -> Self {
        Self::with_extension("rule")
    }

    pub fn with_extension(extension: &str) -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            extension: extension.to_string(),
        }
    }

    pub fn rules_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes a file relative to the rules directory, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let child = self.temp_dir.child(relative);
        child.write_str(content).expect("Failed to write rule file");
        child.path().to_path_buf()
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let child = self.temp_dir.child(relative);
        child.create_dir_all().expect("Failed to create directory");
        child.path().to_path_buf()
    }

    pub fn reconciler(&self, engine: Arc<RecordingEngine>) -> DirectoryReconciler {
        DirectoryReconciler::new(
            self.rules_dir(),
            RuleFileSelector::new(self.extension.clone()),
            RulesetApplier::new(engine),
        )
    }

    pub fn reconcile_loop(&self, engine: Arc<RecordingEngine>, window: Duration) -> ReconcileLoop {
        ReconcileLoop::new(self.reconciler(engine), ChangeDebouncer::new(window))
    }
}
