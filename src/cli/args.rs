//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::{InsertionOrder, RenderFormat};

/// Document head manager: reconcile nested title, base, meta and link declarations
#[derive(Parser, Debug)]
#[command(name = "rshead")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level (repeat for more: -d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Project directory for local config (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile declaration chains and print the resolved state as JSON
    Build {
        /// Leaf declaration files, outermost first
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },

    /// Print the resolved title
    Title {
        /// Leaf declaration files, outermost first
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },

    /// Render the resolved head for static output
    Render {
        /// Leaf declaration files, outermost first
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
        /// Output format (default: from config)
        #[arg(short, long, value_enum)]
        format: Option<RenderFormat>,
        /// Wrap the title in a <title> element; `--wrap-title=false` to disable
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        wrap_title: Option<bool>,
    },

    /// Apply the resolved head to an empty document and print it
    Apply {
        /// Leaf declaration files, outermost first
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
        /// Insertion order (default: from config)
        #[arg(short, long, value_enum)]
        order: Option<InsertionOrder>,
    },

    /// List files in the declaration chain, outermost first
    Files {
        /// Leaf declaration file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show the declaration chain and each file's contributions as a tree
    Tree {
        /// Leaf declaration file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
