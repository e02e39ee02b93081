//! Change events derived from raw `notify` events.

use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind};

/// The kind of change observed on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Written,
    Renamed,
    Removed,
    Other,
}

impl ChangeKind {
    /// Whether this kind of change can introduce new rule content.
    ///
    /// Removals are picked up by the next full reconcile.
    pub fn triggers_reconcile(self) -> bool {
        matches!(
            self,
            ChangeKind::Created | ChangeKind::Written | ChangeKind::Renamed
        )
    }
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
                ChangeKind::Written
            }
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Renamed,
            EventKind::Remove(_) => ChangeKind::Removed,
            _ => ChangeKind::Other,
        }
    }
}

/// One observed change to one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Absolute path as reported by the watcher.
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    /// Builds an event by hand; the watcher uses [`from_notify`](Self::from_notify).
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Splits a notify event into one change event per affected path.
    pub fn from_notify(event: notify::Event) -> Vec<ChangeEvent> {
        let kind = ChangeKind::from(&event.kind);
        event
            .paths
            .into_iter()
            .map(|path| ChangeEvent { path, kind })
            .collect()
    }
}

/// A single item on the watcher's event stream.
pub type WatchMessage = Result<ChangeEvent, notify::Error>;
