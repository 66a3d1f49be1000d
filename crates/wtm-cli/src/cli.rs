//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wtm_core::SettingsOverrides;

/// Worktree manager - create, list, delete and refresh git worktrees
/// across a directory of repositories
#[derive(Parser, Debug)]
#[command(name = "wtm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing the repositories
    #[arg(long, global = true, env = "WTM_ROOT")]
    pub root: Option<PathBuf>,

    /// Delimiter between repository and branch in worktree names
    #[arg(long, global = true, env = "WTM_SUFFIX")]
    pub suffix: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "WTM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run one action; without a command the interactive menu opens
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            root: self.root.clone(),
            suffix: self.suffix.clone(),
            config: self.config.clone(),
        }
    }
}

/// Available commands
///
/// Omitted arguments are asked for interactively.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a worktree from an existing branch
    Create {
        /// Repository name
        repo: Option<String>,
        /// Branch to check out
        branch: Option<String>,
    },

    /// Create a worktree on a new branch
    New {
        /// Repository name
        repo: Option<String>,
        /// Branch the new branch starts from
        base: Option<String>,
        /// Name of the new branch (sanitized)
        name: Option<String>,
    },

    /// Delete a worktree
    Delete {
        /// Worktree directory name
        dir: Option<String>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List worktrees
    List,

    /// Fetch all remotes of one repository
    Fetch {
        /// Repository name
        repo: Option<String>,
    },

    /// Pull or fetch the default branch of every repository
    Refresh,
}
