//! Filesystem helpers for the worktree manager
//!
//! Provides normalized paths, configuration loading and the directory
//! operations the worktree lifecycle relies on.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::RepoPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, is_plain_segment};
