//! User-facing output.
//!
//! Operations never print directly. They report progress and per-item failures to a
//! [`Reporter`] chosen by the caller: colored, plain, or silent. This module also
//! formats rendered trees as `tree`-style text or JSON.

use crate::PrunecopyError;
use crate::types::TreeNode;
use owo_colors::OwoColorize;

/// Sink for messages produced while copying, archiving or rendering.
pub trait Reporter {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Yellow informational lines on stdout, red errors on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorReporter;

impl Reporter for ColorReporter {
    fn info(&self, message: &str) {
        println!("{}", message.yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message.red());
    }
}

/// Uncolored output, for pipes and `NO_COLOR`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainReporter;

impl Reporter for PlainReporter {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn info(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}

/// Picks the colored or plain backend.
pub fn reporter(color: bool) -> Box<dyn Reporter> {
    if color {
        Box::new(ColorReporter)
    } else {
        Box::new(PlainReporter)
    }
}

/// Supported tree output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tree,
    Json,
}

/// Formats a rendered tree.
pub fn format_tree(
    node: &TreeNode,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, PrunecopyError> {
    match format {
        OutputFormat::Tree => Ok(tree_lines(node).join("\n")),
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(node)?),
        OutputFormat::Json => Ok(serde_json::to_string(node)?),
    }
}

/// Renders a tree as lines in the style of the `tree` command.
///
/// The first line is the root name followed by `/`; directories are suffixed with `/`.
pub fn tree_lines(node: &TreeNode) -> Vec<String> {
    let mut lines = vec![display_name(node)];
    push_children(node, "", &mut lines);
    lines
}

// ----------------------- Internal formatting -----------------------

fn push_children(node: &TreeNode, prefix: &str, lines: &mut Vec<String>) {
    let total = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i + 1 == total;
        let connector = if is_last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, connector, display_name(child)));
        if child.is_dir {
            let next = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            push_children(child, &next, lines);
        }
    }
}

fn display_name(node: &TreeNode) -> String {
    if node.is_dir && !node.name.ends_with('/') {
        format!("{}/", node.name)
    } else {
        node.name.clone()
    }
}
