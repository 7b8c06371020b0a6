//! CLI command implementations

pub mod definition;
pub mod ignore;
pub mod plan;
pub mod prompt;
pub mod scan;
pub mod setup;
pub mod status;

pub use definition::{Cli, Commands};

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::openclaw::IGNORE_FILE_NAME;
use crate::plan::ignore_list;

/// What every command needs: the user config and the directories it resolves to.
pub struct Environment {
    pub config: Config,
    pub home: PathBuf,
    pub output_dir: PathBuf,
}

impl Environment {
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let home = config::home_dir()?;
        let output_dir = config.output_dir(&home);
        Ok(Self {
            config,
            home,
            output_dir,
        })
    }

    pub fn ignore_file(&self) -> PathBuf {
        self.output_dir.join(IGNORE_FILE_NAME)
    }
}

/// Patterns from an existing ignore file, or nothing when there is none yet.
pub fn read_ignore_file(path: &Path) -> Result<BTreeSet<String>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(ignore_list::parse(&text))
}

/// Shorten `s` to at most `max` characters, ending in `...` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let kept: String = s.chars().take(max - 3).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 2), "he");
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_read_ignore_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".clawignore");
        assert!(read_ignore_file(&path).unwrap().is_empty());

        fs::write(&path, "# keys\n/home/u/.ssh\n\n*.pem\n").unwrap();
        let patterns = read_ignore_file(&path).unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(patterns.contains("/home/u/.ssh"));
    }
}
