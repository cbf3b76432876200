use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::{OutputFormatArg, PreviewArg, RenameTypeArg};

/// Scaffold, import and rename OneFramework node modules in a west workspace
#[derive(Parser, Debug)]
#[command(name = "onekit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Output format for results
    #[arg(long = "format", global = true, value_enum, default_value_t = OutputFormatArg::Summary)]
    pub format: OutputFormatArg,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new node module from templates
    CreateNode {
        /// Git URL of the module repository, or a plain module name
        target: String,

        /// Directory to create the module in (default: <root>/modules/lib/nodes/<name>)
        #[arg(short = 'o', long = "output", value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Data structure name (default: <Name>Data)
        #[arg(long, value_name = "NAME")]
        data_type: Option<String>,

        /// Thread stack size
        #[arg(long, value_name = "N")]
        stack_size: Option<u32>,

        /// Thread priority
        #[arg(long, value_name = "N", allow_negative_numbers = true)]
        priority: Option<i32>,

        /// Meta::name value (default: <name> in snake case)
        #[arg(long, value_name = "NAME")]
        meta_name: Option<String>,

        /// Topic variable name (default: topic_<name> in snake case)
        #[arg(long, value_name = "NAME")]
        topic_name: Option<String>,

        /// Topic string (default: <name>_data in snake case)
        #[arg(long, value_name = "STR")]
        topic_string: Option<String>,

        /// Replace an existing module directory
        #[arg(short = 'f', long)]
        force: bool,

        /// Register the new module in the workspace manifest
        #[arg(long)]
        add_to_manifest: bool,

        /// Initialize a git repository in the module and make the first commit
        #[arg(long)]
        init_git: bool,
    },

    /// Add an existing module, remote or local, to the workspace manifest
    AddNode {
        /// Git URL or path to a module directory
        source: String,

        /// Project name (default: from the URL or module.yml)
        #[arg(long)]
        name: Option<String>,

        /// West remote name
        #[arg(long)]
        remote: Option<String>,

        /// Revision to check out (default: main)
        #[arg(long)]
        revision: Option<String>,

        /// Repository path on the remote, e.g. org/repo
        #[arg(long, value_name = "ORG/REPO")]
        repo_path: Option<String>,

        /// Path in the workspace (default: modules/lib/nodes/<name>)
        #[arg(long, value_name = "PATH")]
        target_path: Option<String>,

        /// Manifest file to edit (default: discovered west.yml)
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,
    },

    /// Rename the class, module, topic or meta name of a node module
    RenameNode {
        /// Module directory (default: current directory)
        path: Option<PathBuf>,

        /// Take everything from flags instead of asking
        #[arg(long, requires_all = ["rename_type", "new_name"])]
        non_interactive: bool,

        /// What to rename
        #[arg(long = "type", value_enum, value_name = "TYPE")]
        rename_type: Option<RenameTypeArg>,

        /// The new name
        #[arg(long, value_name = "NAME")]
        new_name: Option<String>,

        /// The current name, when it cannot be detected
        #[arg(long, value_name = "NAME")]
        old_name: Option<String>,

        /// Show what would change without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the backup copy of the module
        #[arg(long)]
        no_backup: bool,

        /// Preview format
        #[arg(long, value_enum, default_value_t = PreviewArg::Summary)]
        preview: PreviewArg,

        /// Assume yes for the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}
