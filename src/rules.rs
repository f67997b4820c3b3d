//! Gitignore-style rule loading and matching.
//!
//! A [`RuleSet`] is an ordered list of [`Rule`]s read top to bottom from an ignore
//! file. Rules are evaluated in reverse, so the last rule that matches a path decides
//! whether it is ignored (`pattern`) or kept (`!pattern`). A path that matches no rule
//! is always kept.
//!
//! Patterns ending in `/` only apply to directories. Bare names such as `*.pyc` or
//! `target/` are registered twice, once as written and once with a `**/` prefix, so
//! they match at any depth.
//!
//! Nothing in this module touches the filesystem except [`RuleSet::load`].

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{MAIN_SEPARATOR, Path};
#[cfg(feature = "logging")]
use tracing;

/// Name of the ignore file kept in the configuration directory.
pub const IGNORE_FILE_NAME: &str = ".cp_ignore";

/// Rules used when no ignore file exists.
///
/// Covers VCS directories, build outputs, virtual environments, editor metadata and
/// OS metadata files.
pub const DEFAULT_IGNORE_RULES: &[&str] = &[
    // Python bytecode & metadata
    "*.py[cod]",
    "*.pyc",
    "*.pyo",
    "__pycache__/",
    "*.egg-info/",
    "*.egg",
    "pip-wheel-metadata/",
    // Build & virtual environment directories
    "*build*/",
    "*Build*/",
    "*BUILD*/",
    "dist/",
    "venv/",
    "env/",
    // System-generated files
    "Thumbs.db",
    ".DS_Store",
    "*.swp",
    "*.swo",
    "*.bak",
    // Native & compiled binary artifacts
    "bin/",
    "obj/",
    "out/",
    "*debug*/",
    "*release*/",
    // Development & project settings
    ".vscode/",
    ".idea/",
    ".git/",
    ".svn/",
    ".tox/",
    ".coverage",
    "node_modules/",
];

/// A single ignore or include rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Glob pattern, with any leading `!` already removed.
    pub pattern: String,
    /// `true` for `!pattern` rules, which keep a path instead of ignoring it.
    pub is_include: bool,
}

impl Rule {
    pub fn ignore(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_include: false,
        }
    }

    pub fn include(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_include: true,
        }
    }

    /// Whether the rule only applies to directories (trailing `/`).
    pub fn is_dir_only(&self) -> bool {
        self.pattern.ends_with('/')
    }
}

/// Parses one line of an ignore file.
///
/// Returns `None` for blank lines and comments. Inline `#` comments are stripped,
/// and a leading `!` turns the line into an include rule.
pub fn parse_line(line: &str) -> Option<Rule> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return None;
    }
    match line.strip_prefix('!') {
        Some(rest) => Some(Rule::include(rest.trim())),
        None => Some(Rule::ignore(line)),
    }
}

/// Bare names and unanchored directory patterns also get a `**/` variant.
fn needs_recursive_variant(pattern: &str) -> bool {
    !pattern.contains('/')
        || (pattern.ends_with('/') && !pattern.starts_with('/') && !pattern.starts_with("**/"))
}

#[derive(Debug, Clone)]
enum Matcher {
    Glob(GlobMatcher),
    // Patterns that are not valid globs are compared verbatim.
    Literal(String),
}

impl Matcher {
    fn new(pattern: &str) -> Self {
        let source = pattern.strip_prefix('/').unwrap_or(pattern);
        match GlobBuilder::new(source).literal_separator(true).build() {
            Ok(glob) => Matcher::Glob(glob.compile_matcher()),
            Err(_e) => {
                #[cfg(feature = "logging")]
                tracing::debug!("Invalid glob pattern '{}', matching literally: {}", pattern, _e);
                Matcher::Literal(source.to_string())
            }
        }
    }

    fn is_match(&self, candidate: &str) -> bool {
        match self {
            Matcher::Glob(glob) => glob.is_match(candidate),
            Matcher::Literal(literal) => literal == candidate,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: Rule,
    matcher: Matcher,
}

impl CompiledRule {
    fn new(rule: Rule) -> Self {
        let matcher = Matcher::new(&rule.pattern);
        Self { rule, matcher }
    }
}

/// An ordered, compiled list of rules evaluated with last-match-wins semantics.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Creates an empty rule set, which keeps every path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule set from raw rules, dropping empty patterns and adding the
    /// `**/` variant of bare names.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut set = Self::new();
        for rule in rules {
            set.add_normalized(rule);
        }
        set
    }

    /// Parses ignore-file lines and appends `extra` as plain ignore rules.
    pub fn parse<'a, I>(lines: I, extra: &[String]) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let parsed = lines.into_iter().filter_map(parse_line);
        Self::from_rules(parsed.chain(extra_rules(extra)))
    }

    /// The built-in rule table plus `extra`.
    pub fn defaults(extra: &[String]) -> Self {
        Self::parse(DEFAULT_IGNORE_RULES.iter().copied(), extra)
    }

    /// Reads an ignore file, falling back to [`DEFAULT_IGNORE_RULES`] when it is
    /// missing or unreadable.
    pub fn load(path: impl AsRef<Path>, extra: &[String]) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(content.lines(), extra),
            Err(_e) => {
                #[cfg(feature = "logging")]
                tracing::debug!(
                    "Ignore file {} not usable ({}), using default rules",
                    path.display(),
                    _e
                );
                Self::defaults(extra)
            }
        }
    }

    fn add_normalized(&mut self, rule: Rule) {
        let pattern = rule.pattern.trim();
        if pattern.is_empty() {
            return;
        }
        if needs_recursive_variant(pattern) {
            self.rules.push(CompiledRule::new(Rule {
                pattern: format!("**/{}", pattern),
                is_include: rule.is_include,
            }));
        }
        self.rules.push(CompiledRule::new(Rule {
            pattern: pattern.to_string(),
            is_include: rule.is_include,
        }));
    }

    /// Appends a rule as-is, without the `**/` expansion.
    pub fn push(&mut self, rule: Rule) {
        if rule.pattern.is_empty() {
            return;
        }
        self.rules.push(CompiledRule::new(rule));
    }

    /// Appends a plain ignore rule as-is.
    pub fn push_ignore(&mut self, pattern: impl Into<String>) {
        self.push(Rule::ignore(pattern));
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decides whether a path relative to the tree root is excluded.
    ///
    /// Directories are only tested against directory rules (patterns ending in `/`);
    /// files are tested against every rule. The last matching rule wins, and a path
    /// matching nothing is kept.
    pub fn should_ignore(&self, relative: &Path, is_dir: bool) -> bool {
        self.should_ignore_str(&to_slash(relative), is_dir)
    }

    /// Same as [`RuleSet::should_ignore`] for a `/`-separated path string.
    pub fn should_ignore_str(&self, relative: &str, is_dir: bool) -> bool {
        let mut candidate = relative.to_string();
        if is_dir && !candidate.ends_with('/') {
            candidate.push('/');
        }
        self.rules
            .iter()
            .rev()
            .filter(|compiled| !is_dir || compiled.rule.is_dir_only())
            .find(|compiled| compiled.matcher.is_match(&candidate))
            .map(|compiled| !compiled.rule.is_include)
            .unwrap_or(false)
    }
}

fn extra_rules(extra: &[String]) -> impl Iterator<Item = Rule> + '_ {
    extra.iter().map(|pattern| Rule::ignore(pattern.trim()))
}

/// Renders a path with `/` separators on every platform.
pub(crate) fn to_slash(path: &Path) -> String {
    let text = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(MAIN_SEPARATOR, "/")
    }
}

/// Function form of [`RuleSet::should_ignore`].
pub fn should_ignore(relative: impl AsRef<Path>, rules: &RuleSet, is_dir: bool) -> bool {
    rules.should_ignore(relative.as_ref(), is_dir)
}

/// Anything that can decide whether a relative path is excluded from a walk.
///
/// [`RuleSet`] is the real implementation; the seam lets walks be driven by wrapped
/// or instrumented filters.
pub trait PathFilter: Send + Sync {
    fn should_ignore(&self, relative: &Path, is_dir: bool) -> bool;
}

impl PathFilter for RuleSet {
    fn should_ignore(&self, relative: &Path, is_dir: bool) -> bool {
        RuleSet::should_ignore(self, relative, is_dir)
    }
}
