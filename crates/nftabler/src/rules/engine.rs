//! The external rule-loading engine.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::config::Config;

/// Result of a single engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    /// The engine exited zero.
    pub success: bool,
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// stdout followed by stderr.
    pub output: String,
}

/// Anything that can load a ruleset streamed from a file.
///
/// Implementations block until the ruleset has been fully processed.
pub trait RuleEngine: Send + Sync {
    fn load(&self, rules: File) -> io::Result<EngineOutput>;
}

/// Runs `nft -f -` with the rule file as stdin.
#[derive(Debug, Clone)]
pub struct NftEngine {
    binary: PathBuf,
    args: Vec<String>,
}

impl NftEngine {
    /// `args` are passed verbatim; they must make `nft` read from stdin.
    pub fn new(binary: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            args,
        }
    }

    /// Uses the configured binary and arguments, prefixed with `-c` in dry run.
    pub fn from_config(config: &Config) -> Self {
        let mut args = Vec::with_capacity(config.nft_args.len() + 1);
        if config.dry_run {
            args.push("-c".to_string());
        }
        args.extend(config.nft_args.iter().cloned());
        Self::new(&config.nft_binary, args)
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl RuleEngine for NftEngine {
    fn load(&self, rules: File) -> io::Result<EngineOutput> {
        let output = Command::new(&self.binary)
            .args(&self.args)
            .stdin(Stdio::from(rules))
            .output()?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(EngineOutput {
            success: output.status.success(),
            code: output.status.code(),
            output: combined.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_default_args() {
        let engine = NftEngine::from_config(&Config::default());
        assert_eq!(engine.binary(), &PathBuf::from("/usr/sbin/nft"));
        assert_eq!(engine.args(), ["-f", "-"]);
    }

    #[test]
    fn test_from_config_dry_run_checks_only() {
        let config = Config {
            dry_run: true,
            ..Config::default()
        };
        let engine = NftEngine::from_config(&config);
        assert_eq!(engine.args(), ["-c", "-f", "-"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_load_streams_file_to_stdin() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("table.nft");
        std::fs::write(&path, "table inet filter {}\n").unwrap();

        let engine = NftEngine::new("cat", vec![]);
        let output = engine.load(File::open(&path).unwrap()).unwrap();

        assert!(output.success);
        assert_eq!(output.code, Some(0));
        assert_eq!(output.output, "table inet filter {}");
    }

    #[cfg(unix)]
    #[test]
    fn test_load_captures_stderr_on_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.nft");
        std::fs::write(&path, "garbage").unwrap();

        let engine = NftEngine::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo 'Error: syntax error' >&2; exit 1".to_string(),
            ],
        );
        let output = engine.load(File::open(&path).unwrap()).unwrap();

        assert!(!output.success);
        assert_eq!(output.code, Some(1));
        assert_eq!(output.output, "Error: syntax error");
    }

    #[test]
    fn test_load_missing_binary() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a.nft");
        std::fs::write(&path, "").unwrap();

        let engine = NftEngine::new("/nonexistent/nft", vec![]);
        assert!(engine.load(File::open(&path).unwrap()).is_err());
    }
}
