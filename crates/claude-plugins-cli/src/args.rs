use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "claude-plugins")]
#[command(about = "Manage enable/disable state and scope of Claude Code plugins")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Claude configuration directory (default: ~/.claude)
    #[arg(long, global = true, env = "CLAUDE_CONFIG_DIR")]
    pub claude_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Project directories must already exist
fn existing_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("directory does not exist: {value}"))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ScopeArg {
    Project,
    User,
    Global,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all installed plugins and their status
    List {
        /// Project directory (default: current directory)
        #[arg(short, long, value_parser = existing_dir)]
        path: Option<PathBuf>,

        /// Print status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Enable a plugin for the project
    Enable {
        /// Plugin name (full name@marketplace or a unique part of the name)
        plugin: String,

        /// Project directory (default: current directory)
        #[arg(short, long, value_parser = existing_dir)]
        path: Option<PathBuf>,
    },

    /// Disable a plugin for the project
    Disable {
        /// Plugin name (full name@marketplace or a unique part of the name)
        plugin: String,

        /// Project directory (default: current directory)
        #[arg(short, long, value_parser = existing_dir)]
        path: Option<PathBuf>,
    },

    /// Change the scope of a plugin installation
    ChangeScope {
        /// Plugin name (full name@marketplace or a unique part of the name)
        plugin: String,

        /// New scope
        #[arg(value_enum)]
        scope: ScopeArg,

        /// Project directory for project scope (default: current directory)
        #[arg(short, long, value_parser = existing_dir)]
        path: Option<PathBuf>,

        /// Installation index
        #[arg(short, long, default_value = "0")]
        index: usize,
    },

    /// Add all installed plugins to local settings as disabled
    Sync {
        /// Project directory (default: current directory)
        #[arg(short, long, value_parser = existing_dir)]
        path: Option<PathBuf>,
    },

    /// Show configuration file locations
    Info {
        /// Project directory (default: current directory)
        #[arg(short, long, value_parser = existing_dir)]
        path: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
