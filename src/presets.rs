//! Named groups of extra ignore patterns.
//!
//! Groups live in an INI file, one section per group, each with a comma-separated
//! `patterns` key:
//!
//! ```ini
//! [exclude-log]
//! patterns = *.log, logs/
//! ```
//!
//! The `exclude-zip`, `exclude-log` and `exclude-db` groups are built in; sections of
//! the same name in the file replace them.

use crate::error::PrunecopyError;
use ini::Ini;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Name of the presets file kept in the configuration directory.
pub const PRESETS_FILE_NAME: &str = "exclude-rules.ini";

pub const EXCLUDE_ZIP: &str = "exclude-zip";
pub const EXCLUDE_LOG: &str = "exclude-log";
pub const EXCLUDE_DB: &str = "exclude-db";

const BUILTIN_PRESETS: &[(&str, &[&str])] = &[
    (
        EXCLUDE_ZIP,
        &["*.zip", "*.tar", "*.tar.gz", "*.tgz", "*.7z", "*.rar"],
    ),
    (EXCLUDE_LOG, &["*.log", "logs/"]),
    (EXCLUDE_DB, &["*.db", "*.sqlite", "*.sqlite3"]),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presets {
    groups: BTreeMap<String, Vec<String>>,
}

impl Presets {
    pub fn builtin() -> Self {
        let groups = BUILTIN_PRESETS
            .iter()
            .map(|(name, patterns)| {
                let patterns = patterns.iter().map(|p| p.to_string()).collect();
                (name.to_string(), patterns)
            })
            .collect();
        Self { groups }
    }

    /// Parses INI content on top of the built-in groups.
    pub fn parse(content: &str) -> Result<Self, PrunecopyError> {
        let ini = Ini::load_from_str(content).map_err(|e| PrunecopyError::Preset(e.to_string()))?;
        let mut presets = Self::builtin();
        for (section, properties) in ini.iter() {
            let Some(section) = section else {
                continue;
            };
            let patterns = properties
                .get("patterns")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            presets.groups.insert(section.to_string(), patterns);
        }
        Ok(presets)
    }

    /// Reads a presets file. A missing file yields the built-in groups.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PrunecopyError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map_err(|e| match e {
                PrunecopyError::Preset(message) => {
                    PrunecopyError::Preset(format!("{}: {}", path.display(), message))
                }
                other => other,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::builtin()),
            Err(e) => Err(PrunecopyError::io(path, e)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Concatenates the patterns of the named groups, in order.
    ///
    /// # Errors
    ///
    /// Returns [`PrunecopyError::Preset`] for a name with no group.
    pub fn expand(&self, names: &[String]) -> Result<Vec<String>, PrunecopyError> {
        let mut patterns = Vec::new();
        for name in names {
            let group = self
                .get(name)
                .ok_or_else(|| PrunecopyError::Preset(format!("unknown preset group '{}'", name)))?;
            patterns.extend(group.iter().cloned());
        }
        Ok(patterns)
    }
}
