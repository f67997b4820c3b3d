use crate::archive::ArchiveFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An item that could not be copied or archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// The offending path, when the error could be tied to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub message: String,
}

/// Outcome of a [`copy`](crate::copy) run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyReport {
    /// The resolved source path.
    pub source: PathBuf,
    /// The resolved destination directory, including any created subdirectory.
    pub target: PathBuf,
    pub files_copied: usize,
    pub dirs_created: usize,
    /// Directory symlinks recreated at the destination.
    pub links_created: usize,
    /// Per-item errors. The copy carries on past each of them.
    pub failures: Vec<Failure>,
}

impl CopyReport {
    pub(crate) fn new(source: PathBuf, target: PathBuf) -> Self {
        Self {
            source,
            target,
            files_copied: 0,
            dirs_created: 0,
            links_created: 0,
            failures: Vec::new(),
        }
    }
}

/// Outcome of an [`archive`](crate::archive) run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub format: ArchiveFormat,
    /// Names of the members written, `/`-separated and relative to the source.
    pub entries: Vec<String>,
    pub failures: Vec<Failure>,
}

/// A node of a rendered directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub is_dir: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}
