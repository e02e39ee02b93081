//! Decides which directory entries are rule files.

use std::path::{Path, PathBuf};

use walkdir::DirEntry;

/// What to do with a single directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A rule file that should be handed to the engine.
    Apply,
    /// A directory; traversed by the walker but never applied.
    Skip,
    /// A file without the rule extension.
    Invalid(PathBuf),
}

/// Matches rule files by extension.
#[derive(Debug, Clone)]
pub struct RuleFileSelector {
    extension: String,
}

impl RuleFileSelector {
    /// Creates a selector for the given bare extension (e.g. `"nft"`).
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    pub fn select(&self, path: &Path, is_dir: bool) -> Selection {
        if is_dir {
            return Selection::Skip;
        }

        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false);

        if matches {
            Selection::Apply
        } else {
            Selection::Invalid(path.to_path_buf())
        }
    }

    pub fn select_entry(&self, entry: &DirEntry) -> Selection {
        self.select(entry.path(), entry.file_type().is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_file_applied() {
        let selector = RuleFileSelector::new("rule");
        assert_eq!(
            selector.select(Path::new("/etc/fw/a.rule"), false),
            Selection::Apply
        );
    }

    #[test]
    fn test_directory_skipped() {
        let selector = RuleFileSelector::new("rule");
        assert_eq!(selector.select(Path::new("/etc/fw/c"), true), Selection::Skip);
        // a directory named like a rule file is still just a directory
        assert_eq!(
            selector.select(Path::new("/etc/fw/d.rule"), true),
            Selection::Skip
        );
    }

    #[test]
    fn test_other_extension_invalid() {
        let selector = RuleFileSelector::new("rule");
        assert_eq!(
            selector.select(Path::new("/etc/fw/b.txt"), false),
            Selection::Invalid(PathBuf::from("/etc/fw/b.txt"))
        );
        assert_eq!(
            selector.select(Path::new("/etc/fw/noext"), false),
            Selection::Invalid(PathBuf::from("/etc/fw/noext"))
        );
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        let selector = RuleFileSelector::new("nft");
        assert!(matches!(
            selector.select(Path::new("base.NFT"), false),
            Selection::Invalid(_)
        ));
    }

    #[test]
    fn test_temp_suffix_not_applied() {
        let selector = RuleFileSelector::new("nft");
        assert!(matches!(
            selector.select(Path::new("base.nft.tmp"), false),
            Selection::Invalid(_)
        ));
    }
}
