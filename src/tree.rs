//! Builds a [`TreeNode`] hierarchy from a filtered walk.

use crate::engine::{WalkOptions, Walker, resolve};
use crate::error::PrunecopyError;
use crate::options::Options;
use crate::output::Reporter;
use crate::rules::RuleSet;
use crate::types::TreeNode;
use std::path::Path;
use std::sync::Arc;

/// Walks `src` with `rules` applied and returns the visible tree.
///
/// `options.max_depth` counts directory levels below the root's children, so `Some(0)`
/// only lists the root's direct entries. Children are ordered directories first, then
/// by case-insensitive name. Unreadable directories are reported and left empty.
///
/// Directory symlinks are shown as directories. They are only expanded when
/// `options.follow_links` is set.
///
/// # Errors
///
/// Returns an error if `src` does not exist or is not a directory.
pub fn render_tree(
    src: impl AsRef<Path>,
    rules: &RuleSet,
    options: &Options,
    reporter: &dyn Reporter,
) -> Result<TreeNode, PrunecopyError> {
    let src = resolve(src.as_ref())?;
    if !src.exists() {
        return Err(PrunecopyError::InvalidPath(format!(
            "source {} does not exist",
            src.display()
        )));
    }
    if !src.is_dir() {
        return Err(PrunecopyError::InvalidPath(format!(
            "source {} must be a directory",
            src.display()
        )));
    }

    let name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| src.display().to_string());
    let mut root = TreeNode {
        name,
        is_dir: true,
        children: Vec::new(),
    };

    let walk = WalkOptions {
        max_depth: options.max_depth.map(|depth| depth + 1),
        follow_links: options.follow_links,
    };
    for entry in Walker::new(&src, Arc::new(rules.clone()), walk) {
        match entry {
            Ok(entry) => {
                let parts: Vec<String> = entry
                    .relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                insert(&mut root, &parts, entry.is_dir);
            }
            Err(e) => reporter.error(&e.to_string()),
        }
    }

    sort_children(&mut root);
    Ok(root)
}

fn insert(node: &mut TreeNode, parts: &[String], is_dir: bool) {
    let Some((first, rest)) = parts.split_first() else {
        return;
    };
    let position = match node.children.iter().position(|c| &c.name == first) {
        Some(position) => position,
        None => {
            node.children.push(TreeNode {
                name: first.clone(),
                is_dir: is_dir || !rest.is_empty(),
                children: Vec::new(),
            });
            node.children.len() - 1
        }
    };
    insert(&mut node.children[position], rest, is_dir);
}

fn sort_children(node: &mut TreeNode) {
    node.children
        .sort_by_cached_key(|c| (!c.is_dir, c.name.to_lowercase(), c.name.clone()));
    for child in &mut node.children {
        sort_children(child);
    }
}
