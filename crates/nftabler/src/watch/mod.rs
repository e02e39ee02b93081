//! Watching the rules directory and debouncing its change events.

pub mod debouncer;
pub mod event;
pub mod watcher;

pub use debouncer::{ChangeDebouncer, ReconcileTrigger};
pub use event::{ChangeEvent, ChangeKind, WatchMessage};
pub use watcher::RuleWatcher;
