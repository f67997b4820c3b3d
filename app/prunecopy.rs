//! Command-line interface for prunecopy.
//!
//! Copies, archives and draws directory trees with `.cp_ignore` rules applied, and
//! manages the default ignore file.

use clap::{Args, Parser, Subcommand, ValueEnum};
use prunecopy::output::{self, OutputFormat};
use prunecopy::{
    IgnoreStore, Presets, PrunecopyBuilder, PrunecopyError, Reporter, SilentReporter, archive,
    copy, default_ignore_file, default_presets_file, presets, render_tree,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::exit;

/// prunecopy — copy, archive and tree with gitignore-style rules
#[derive(Parser)]
#[command(name = "prunecopy", version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Suppress all messages
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy files or directories with ignore rules
    Cp {
        /// Source path (directory or file)
        src: PathBuf,
        /// Target directory
        target: PathBuf,
        /// Create a subdirectory with the same name as the source
        #[arg(long)]
        create_subdir: bool,
        /// Follow symlinks
        #[arg(long)]
        follow_links: bool,
        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Create a .zip, .tar or .tar.gz archive with ignore rules
    Archive {
        /// Source directory or file
        src: PathBuf,
        /// Output archive path (.zip, .tar, .tar.gz or .tgz)
        output: PathBuf,
        /// Follow symlinks
        #[arg(long)]
        follow_links: bool,
        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Display the directory structure with ignore rules
    Tree {
        /// Source directory
        #[arg(default_value = ".")]
        src: PathBuf,
        /// Maximum depth to traverse (unlimited if not set)
        #[arg(long)]
        max_depth: Option<usize>,
        /// Output format
        #[arg(long, value_enum, default_value_t = TreeFormat::Tree)]
        format: TreeFormat,
        /// Pretty JSON output
        #[arg(short, long)]
        pretty: bool,
        /// Expand symlinked directories
        #[arg(long)]
        follow_links: bool,
        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Manage the default .cp_ignore file
    Rules {
        /// Ignore file to manage instead of the default one
        #[arg(long)]
        ignore_file: Option<PathBuf>,
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// Register pattern(s) to include
    Register {
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Add pattern(s) to ignore
    Ignore {
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Export the ignore file
    Export { destination: PathBuf },
    /// Reset the ignore file to the default rules
    Reset,
    /// Open the ignore file in $VISUAL, $EDITOR or nano
    Edit,
    /// Print the effective rules
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the available preset groups
    Presets {
        /// Presets INI file path
        #[arg(long)]
        preset_file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RuleArgs {
    /// Custom ignore file path
    #[arg(long)]
    ignore_file: Option<PathBuf>,

    /// Presets INI file path
    #[arg(long)]
    preset_file: Option<PathBuf>,

    /// Extra ignore patterns (can be repeated)
    #[arg(short = 'I', long = "ignore")]
    ignore_patterns: Vec<String>,

    /// Preset groups to apply (can be repeated)
    #[arg(long = "preset")]
    presets: Vec<String>,

    /// Exclude zip-related patterns
    #[arg(long)]
    exclude_zip: bool,

    /// Exclude log-related patterns
    #[arg(long)]
    exclude_log: bool,

    /// Exclude db-related patterns
    #[arg(long)]
    exclude_db: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TreeFormat {
    Tree,
    Json,
}

impl RuleArgs {
    fn into_builder(self) -> PrunecopyBuilder {
        let mut groups = Vec::new();
        if self.exclude_zip {
            groups.push(presets::EXCLUDE_ZIP.to_string());
        }
        if self.exclude_log {
            groups.push(presets::EXCLUDE_LOG.to_string());
        }
        if self.exclude_db {
            groups.push(presets::EXCLUDE_DB.to_string());
        }
        groups.extend(self.presets);

        let mut builder = PrunecopyBuilder::new()
            .presets(groups)
            .ignore_patterns(self.ignore_patterns);
        if let Some(path) = self.ignore_file {
            builder = builder.ignore_file(path);
        }
        if let Some(path) = self.preset_file {
            builder = builder.preset_file(path);
        }
        builder
    }
}

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let reporter: Box<dyn Reporter> = if cli.quiet {
        Box::new(SilentReporter)
    } else {
        let color = !cli.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();
        output::reporter(color)
    };

    if let Err(e) = run(cli.command, reporter.as_ref()) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn run(command: Command, reporter: &dyn Reporter) -> Result<(), PrunecopyError> {
    match command {
        Command::Cp {
            src,
            target,
            create_subdir,
            follow_links,
            rules,
        } => {
            let options = rules
                .into_builder()
                .create_subdir(create_subdir)
                .follow_links(follow_links)
                .build();
            let report = copy(&src, &target, &options.load_rules()?, &options, reporter)?;
            finish(report.failures.len())
        }
        Command::Archive {
            src,
            output,
            follow_links,
            rules,
        } => {
            let options = rules.into_builder().follow_links(follow_links).build();
            let report = archive(&src, &output, &options.load_rules()?, &options, reporter)?;
            finish(report.failures.len())
        }
        Command::Tree {
            src,
            max_depth,
            format,
            pretty,
            follow_links,
            rules,
        } => {
            let mut builder = rules.into_builder().follow_links(follow_links);
            builder = match max_depth {
                Some(depth) => builder.max_depth(depth),
                None => builder.no_limit_depth(),
            };
            let options = builder.build();
            let tree = render_tree(&src, &options.load_rules()?, &options, reporter)?;
            match format {
                TreeFormat::Tree => {
                    for line in output::tree_lines(&tree) {
                        reporter.info(&line);
                    }
                }
                TreeFormat::Json => {
                    println!("{}", output::format_tree(&tree, OutputFormat::Json, pretty)?);
                }
            }
            Ok(())
        }
        Command::Rules {
            ignore_file,
            action,
        } => run_rules(
            IgnoreStore::new(ignore_file.unwrap_or_else(default_ignore_file)),
            action,
            reporter,
        ),
    }
}

fn run_rules(
    store: IgnoreStore,
    action: RulesAction,
    reporter: &dyn Reporter,
) -> Result<(), PrunecopyError> {
    let path = store.path().display().to_string();
    match action {
        RulesAction::Register { patterns } => {
            let lines = store.register(&patterns)?;
            reporter.info(&format!("Registered {:?} in {}", lines, path));
        }
        RulesAction::Ignore { patterns } => {
            let lines = store.ignore(&patterns)?;
            reporter.info(&format!("Ignored {:?} in {}", lines, path));
        }
        RulesAction::Export { destination } => {
            store.export(&destination)?;
            reporter.info(&format!(
                "Exported ignore rules to {}",
                destination.display()
            ));
        }
        RulesAction::Reset => {
            store.reset()?;
            reporter.info(&format!("Reset {} to default rules.", path));
        }
        RulesAction::Edit => store.edit()?,
        RulesAction::Show { json } => {
            let rules = store.load(&[]);
            if json {
                let rules: Vec<_> = rules.rules().collect();
                println!("{}", serde_json::to_string_pretty(&rules)?);
            } else {
                for rule in rules.rules() {
                    let prefix = if rule.is_include { "!" } else { "" };
                    reporter.info(&format!("{}{}", prefix, rule.pattern));
                }
            }
        }
        RulesAction::Presets { preset_file } => {
            let groups = Presets::load(preset_file.unwrap_or_else(default_presets_file))?;
            for name in groups.names() {
                let patterns = groups.get(name).unwrap_or_default();
                reporter.info(&format!("{}: {}", name, patterns.join(", ")));
            }
        }
    }
    Ok(())
}

fn finish(failures: usize) -> Result<(), PrunecopyError> {
    if failures == 0 {
        Ok(())
    } else {
        Err(PrunecopyError::Partial(failures))
    }
}
