use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NftablerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Failed to read rules directory '{path}': {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Reconcile task did not complete: {0}")]
    TaskFailed(String),
}

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to initialize file watcher: {0}")]
    Init(#[source] notify::Error),

    #[error("Failed to watch '{path}': {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

pub type Result<T> = std::result::Result<T, NftablerError>;
