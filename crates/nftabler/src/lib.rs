pub mod config;
pub mod daemon;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod rules;
pub mod shutdown;
pub mod watch;

pub use config::{load_config, load_config_from_str, resolve_config, Config, ConfigOverrides};
pub use daemon::RunMode;
pub use error::{ConfigError, NftablerError, ReconcileError, Result, WatchError};
pub use reconcile::{DirectoryReconciler, LoopSummary, ReconcileLoop, ReconcileReport};
pub use rules::{ApplyOutcome, NftEngine, RuleEngine, RuleFileSelector, RulesetApplier};
pub use watch::{ChangeDebouncer, ChangeEvent, ChangeKind, RuleWatcher};
