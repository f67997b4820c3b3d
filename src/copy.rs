use crate::engine::{WalkOptions, Walker, resolve};
use crate::error::PrunecopyError;
use crate::options::Options;
use crate::output::Reporter;
use crate::rules::{self, RuleSet};
use crate::types::{CopyReport, Failure};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
#[cfg(feature = "logging")]
use tracing;

/// Copies `src` into the directory `target`, skipping everything `rules` excludes.
///
/// A file source is copied into `target` as-is. A directory source is walked and its
/// visible entries are recreated under `target` (or `target/<src name>` with
/// `create_subdir`). When `target` lies inside `src`, the target subtree is excluded
/// so the copy never feeds on itself.
///
/// Directory symlinks are recreated as links unless `options.follow_links` is set, in
/// which case their contents are copied.
///
/// Per-item failures are reported and collected in the returned [`CopyReport`].
///
/// # Errors
///
/// Fails if `src` cannot be resolved, if `target` is an existing file or the source
/// itself, or if the target directory cannot be created.
pub fn copy(
    src: impl AsRef<Path>,
    target: impl AsRef<Path>,
    rules: &RuleSet,
    options: &Options,
    reporter: &dyn Reporter,
) -> Result<CopyReport, PrunecopyError> {
    let src = fs::canonicalize(src.as_ref()).map_err(|e| PrunecopyError::io(src.as_ref(), e))?;
    let mut target = resolve(target.as_ref())?;
    if src.is_dir() && options.create_subdir {
        if let Some(name) = src.file_name() {
            target.push(name);
        }
    }
    if target.is_file() {
        return Err(PrunecopyError::TargetIsFile(target));
    }

    let mut rules = rules.clone();
    if src.is_dir() {
        exclude_target(&mut rules, &src, &target)?;
    }

    let mut report = CopyReport::new(src.clone(), target.clone());
    if !target.exists() {
        fs::create_dir_all(&target).map_err(|e| PrunecopyError::io(&target, e))?;
        report.dirs_created += 1;
    }

    if src.is_file() {
        let Some(name) = src.file_name() else {
            return Err(PrunecopyError::InvalidPath(src.display().to_string()));
        };
        let destination = target.join(name);
        fs::copy(&src, &destination).map_err(|e| PrunecopyError::io(&src, e))?;
        report.files_copied += 1;
        reporter.info(&format!(
            "Copied file from {} to {}.",
            src.display(),
            destination.display()
        ));
        return Ok(report);
    }

    let walk = WalkOptions {
        max_depth: None,
        follow_links: options.follow_links,
    };
    for entry in Walker::new(&src, Arc::new(rules), walk) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                reporter.error(&e.to_string());
                report.failures.push(Failure {
                    path: None,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let destination = target.join(&entry.relative);
        let result = if entry.is_dir && entry.is_symlink && !options.follow_links {
            copy_link(&entry.path, &destination).map(|_| report.links_created += 1)
        } else if entry.is_dir {
            if destination.is_dir() {
                Ok(())
            } else {
                fs::create_dir_all(&destination).map(|_| report.dirs_created += 1)
            }
        } else {
            fs::copy(&entry.path, &destination).map(|_| report.files_copied += 1)
        };
        if let Err(e) = result {
            let message = if e.kind() == io::ErrorKind::PermissionDenied {
                format!("Permission Denied: {}", destination.display())
            } else {
                format!("Failed to copy {}: {}", entry.path.display(), e)
            };
            reporter.error(&message);
            report.failures.push(Failure {
                path: Some(entry.path),
                message,
            });
        }
    }

    #[cfg(feature = "logging")]
    tracing::debug!(
        "Copied {} files, created {} directories and {} links, {} failures",
        report.files_copied,
        report.dirs_created,
        report.links_created,
        report.failures.len()
    );
    reporter.info(&format!(
        "Copied from {} to {}, skipping ignored files.",
        src.display(),
        target.display()
    ));
    Ok(report)
}

/// Recreates a directory symlink that is not being followed.
fn copy_link(link: &Path, destination: &Path) -> io::Result<()> {
    let points_to = fs::read_link(link)?;
    if fs::symlink_metadata(destination).is_ok_and(|m| m.file_type().is_symlink()) {
        fs::remove_file(destination)?;
    }
    symlink_dir(&points_to, destination)
}

#[cfg(unix)]
fn symlink_dir(points_to: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(points_to, link)
}

#[cfg(windows)]
fn symlink_dir(points_to: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(points_to, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink_dir(_points_to: &Path, link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot recreate symlink {}", link.display()),
    ))
}

/// Adds an ignore rule for the part of `src` that the copy will write into.
///
/// That is the first segment of the target path that does not exist yet, or the
/// whole target when it already exists.
fn exclude_target(rules: &mut RuleSet, src: &Path, target: &Path) -> Result<(), PrunecopyError> {
    let Ok(relative) = target.strip_prefix(src) else {
        return Ok(());
    };
    if relative.as_os_str().is_empty() {
        return Err(PrunecopyError::InvalidPath(format!(
            "cannot copy {} into itself",
            src.display()
        )));
    }
    let mut prefix = PathBuf::new();
    for component in relative.components() {
        prefix.push(component);
        if !src.join(&prefix).is_dir() {
            break;
        }
    }
    let pattern = format!("{}/", globset::escape(&rules::to_slash(&prefix)));
    #[cfg(feature = "logging")]
    tracing::debug!("Target lies inside source, ignoring {}", pattern);
    rules.push_ignore(pattern);
    Ok(())
}
