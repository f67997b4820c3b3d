//! Management of the persistent ignore file.

use crate::error::PrunecopyError;
use crate::rules::{DEFAULT_IGNORE_RULES, RuleSet};
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
#[cfg(feature = "logging")]
use tracing;

const FALLBACK_EDITOR: &str = "nano";

/// The ignore file that `copy`, `archive` and `tree` read by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreStore {
    path: PathBuf,
}

impl IgnoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `!pattern` include lines. Returns the lines written.
    pub fn register(&self, patterns: &[String]) -> Result<Vec<String>, PrunecopyError> {
        let lines: Vec<String> = patterns.iter().map(|p| format!("!{}", p.trim())).collect();
        self.append(&lines)?;
        Ok(lines)
    }

    /// Appends plain ignore lines. Returns the lines written.
    pub fn ignore(&self, patterns: &[String]) -> Result<Vec<String>, PrunecopyError> {
        let lines: Vec<String> = patterns.iter().map(|p| p.trim().to_string()).collect();
        self.append(&lines)?;
        Ok(lines)
    }

    /// Copies the ignore file to `destination`. If no ignore file exists yet, the
    /// default rules are exported instead.
    pub fn export(&self, destination: impl AsRef<Path>) -> Result<(), PrunecopyError> {
        let destination = destination.as_ref();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => default_content(),
            Err(e) => return Err(PrunecopyError::io(&self.path, e)),
        };
        fs::write(destination, content).map_err(|e| PrunecopyError::io(destination, e))
    }

    /// Overwrites the ignore file with the default rules.
    pub fn reset(&self) -> Result<(), PrunecopyError> {
        self.ensure_parent()?;
        fs::write(&self.path, default_content()).map_err(|e| PrunecopyError::io(&self.path, e))
    }

    /// Opens the ignore file in `$VISUAL`, `$EDITOR` or `nano`, and waits for it.
    pub fn edit(&self) -> Result<(), PrunecopyError> {
        self.ensure_parent()?;
        let editor = ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_EDITOR.to_string());
        let mut words = editor.split_whitespace();
        let program = words.next().unwrap_or(FALLBACK_EDITOR);
        #[cfg(feature = "logging")]
        tracing::debug!("Opening {} with {}", self.path.display(), editor);
        let status = Command::new(program)
            .args(words)
            .arg(&self.path)
            .status()
            .map_err(|e| PrunecopyError::Editor(format!("failed to start {}: {}", program, e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(PrunecopyError::Editor(format!("{} exited with {}", program, status)))
        }
    }

    /// Loads the rules this store currently yields, defaults included.
    pub fn load(&self, extra: &[String]) -> RuleSet {
        RuleSet::load(&self.path, extra)
    }

    fn append(&self, lines: &[String]) -> Result<(), PrunecopyError> {
        self.ensure_parent()?;
        let needs_newline = match fs::read(&self.path) {
            Ok(existing) => existing.last().is_some_and(|&b| b != b'\n'),
            Err(_) => false,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PrunecopyError::io(&self.path, e))?;
        let mut content = String::new();
        if needs_newline {
            content.push('\n');
        }
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        file.write_all(content.as_bytes())
            .map_err(|e| PrunecopyError::io(&self.path, e))
    }

    fn ensure_parent(&self) -> Result<(), PrunecopyError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| PrunecopyError::io(parent, e))
            }
            _ => Ok(()),
        }
    }
}

fn default_content() -> String {
    DEFAULT_IGNORE_RULES
        .iter()
        .map(|rule| format!("{}\n", rule))
        .collect()
}
