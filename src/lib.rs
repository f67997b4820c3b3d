//! # Prunecopy
//!
//! `prunecopy` copies, archives and draws directory trees while honouring
//! gitignore-style rules read from a `.cp_ignore` file.
//!
//! Rules are matched last-match-wins: the bottom-most rule matching a path decides,
//! `!pattern` keeps what an earlier rule excluded, patterns ending in `/` only apply
//! to directories, and a path that matches nothing is kept. Excluded directories are
//! pruned, so nothing below them is visited.
//!
//! # Features
//!
//! - `logging`: Enables debug logging via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use prunecopy::{PrunecopyBuilder, PlainReporter, copy, presets};
//!
//! let options = PrunecopyBuilder::new()
//!     .preset(presets::EXCLUDE_LOG)
//!     .ignore_patterns(vec!["*.tmp".into()])
//!     .create_subdir(true)
//!     .build();
//!
//! let rules = options.load_rules().expect("Failed to load rules");
//! let report = copy("project", "backup", &rules, &options, &PlainReporter)
//!     .expect("Failed to copy");
//!
//! println!("Copied {} files into {}", report.files_copied, report.target.display());
//! ```

mod archive;
mod copy;
mod engine;
mod error;
mod options;
pub mod output;
pub mod presets;
pub mod rules;
mod store;
mod tree;
mod types;

pub use archive::{ArchiveFormat, archive};
pub use copy::copy;
pub use engine::{WalkEntry, WalkOptions, Walker};
pub use error::PrunecopyError;
pub use options::{
    CONFIG_DIR_ENV, Options, PrunecopyBuilder, config_dir, default_ignore_file,
    default_presets_file,
};
pub use output::{ColorReporter, PlainReporter, Reporter, SilentReporter};
pub use presets::Presets;
pub use rules::{DEFAULT_IGNORE_RULES, PathFilter, Rule, RuleSet, should_ignore};
pub use store::IgnoreStore;
pub use tree::render_tree;
pub use types::{ArchiveReport, CopyReport, Failure, TreeNode};
