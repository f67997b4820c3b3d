use crate::error::PrunecopyError;
use crate::presets::{PRESETS_FILE_NAME, Presets};
use crate::rules::{IGNORE_FILE_NAME, RuleSet};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
/// Overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "PRUNECOPY_CONFIG_DIR";
/// Directory holding the ignore file and the presets file.
///
/// `$PRUNECOPY_CONFIG_DIR` when set, otherwise `prunecopy` under the platform config
/// directory, otherwise `.prunecopy` in the working directory.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .map(|dir| dir.join("prunecopy"))
        .unwrap_or_else(|| PathBuf::from(".prunecopy"))
}
pub fn default_ignore_file() -> PathBuf {
    config_dir().join(IGNORE_FILE_NAME)
}
pub fn default_presets_file() -> PathBuf {
    config_dir().join(PRESETS_FILE_NAME)
}
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Ignore file; the one in [`config_dir`] when unset.
    pub ignore_file: Option<PathBuf>,
    /// Presets INI file; the one in [`config_dir`] when unset.
    pub preset_file: Option<PathBuf>,
    /// Preset groups whose patterns are appended to the rules.
    pub presets: Vec<String>,
    /// Extra ignore patterns appended after the presets.
    pub ignore_patterns: Vec<String>,
    pub follow_links: bool,
    pub create_subdir: bool,
    pub max_depth: Option<usize>,
}
impl Options {
    pub fn ignore_file_path(&self) -> PathBuf {
        self.ignore_file.clone().unwrap_or_else(default_ignore_file)
    }
    pub fn preset_file_path(&self) -> PathBuf {
        self.preset_file.clone().unwrap_or_else(default_presets_file)
    }
    /// Builds the rule set for one invocation: the ignore file (or the defaults),
    /// then the selected presets, then the extra patterns.
    pub fn load_rules(&self) -> Result<RuleSet, PrunecopyError> {
        let mut extra = if self.presets.is_empty() {
            Vec::new()
        } else {
            Presets::load(self.preset_file_path())?.expand(&self.presets)?
        };
        extra.extend(self.ignore_patterns.iter().cloned());
        Ok(RuleSet::load(self.ignore_file_path(), &extra))
    }
}
#[derive(Debug, Default)]
pub struct PrunecopyBuilder {
    options: Options,
}
impl PrunecopyBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.ignore_file = Some(path.into());
        self
    }
    pub fn preset_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.preset_file = Some(path.into());
        self
    }
    pub fn preset(mut self, name: impl Into<String>) -> Self {
        self.options.presets.push(name.into());
        self
    }
    pub fn presets(mut self, names: Vec<String>) -> Self {
        self.options.presets = names;
        self
    }
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn create_subdir(mut self, yes: bool) -> Self {
        self.options.create_subdir = yes;
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }
    pub fn no_limit_depth(mut self) -> Self {
        self.options.max_depth = None;
        self
    }
    pub fn build(self) -> Options {
        self.options
    }
}
