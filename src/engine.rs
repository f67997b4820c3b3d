use crate::error::PrunecopyError;
use crate::rules::PathFilter;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
#[cfg(feature = "logging")]
use tracing;
/// Knobs for a filtered walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Deepest level yielded, where the root's children are depth 1.
    pub max_depth: Option<usize>,
    pub follow_links: bool,
}
/// An entry that survived the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
    /// `true` for directories and for symlinks pointing at one.
    pub is_dir: bool,
    pub is_symlink: bool,
    pub depth: usize,
}
/// Depth-first walk that consults a [`PathFilter`] for every entry below the root.
///
/// Excluded directories are pruned: nothing beneath them is visited or tested.
pub struct Walker {
    inner: ignore::Walk,
    root: PathBuf,
}
impl Walker {
    pub fn new(root: impl Into<PathBuf>, filter: Arc<dyn PathFilter>, options: WalkOptions) -> Self {
        let root = root.into();
        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(false)
            .max_depth(options.max_depth)
            .follow_links(options.follow_links);
        let filter_root = root.clone();
        builder.filter_entry(move |entry| {
            let Ok(relative) = entry.path().strip_prefix(&filter_root) else {
                return true;
            };
            if relative.as_os_str().is_empty() {
                return true;
            }
            let ignored = filter.should_ignore(relative, entry_is_dir(entry));
            if ignored {
                #[cfg(feature = "logging")]
                tracing::debug!("Skipping ignored {}", relative.display());
            }
            !ignored
        });
        Self {
            inner: builder.build(),
            root,
        }
    }
}
// Symlinks are classified by what they point at, whether or not they are followed.
fn entry_is_dir(entry: &ignore::DirEntry) -> bool {
    match entry.file_type() {
        Some(t) if t.is_symlink() => fs::metadata(entry.path()).is_ok_and(|m| m.is_dir()),
        Some(t) => t.is_dir(),
        None => false,
    }
}
impl Iterator for Walker {
    type Item = Result<WalkEntry, PrunecopyError>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(PrunecopyError::Walk(e.to_string()))),
            };
            if entry.depth() == 0 {
                continue;
            }
            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => {
                    return Some(Err(PrunecopyError::InvalidPath(
                        entry.path().display().to_string(),
                    )));
                }
            };
            return Some(Ok(WalkEntry {
                path: entry.path().to_path_buf(),
                relative,
                is_dir: entry_is_dir(&entry),
                is_symlink: entry.path_is_symlink(),
                depth: entry.depth(),
            }));
        }
    }
}
/// Makes `path` absolute, resolves symlinks in the part of it that exists and folds
/// `.` and `..` in the rest.
///
/// Unlike [`fs::canonicalize`] this works for paths that are about to be created.
pub(crate) fn resolve(path: &Path) -> Result<PathBuf, PrunecopyError> {
    let absolute = std::path::absolute(path).map_err(|e| PrunecopyError::io(path, e))?;
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(resolved) = fs::canonicalize(existing) {
            return Ok(fold(resolved, missing.into_iter().rev()));
        }
        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(last)) => {
                missing.push(last);
                existing = parent;
            }
            _ => return Ok(fold(PathBuf::new(), absolute.components())),
        }
    }
}
fn fold<'a>(mut base: PathBuf, components: impl Iterator<Item = Component<'a>>) -> PathBuf {
    for component in components {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                base.pop();
            }
            other => base.push(other),
        }
    }
    base
}
