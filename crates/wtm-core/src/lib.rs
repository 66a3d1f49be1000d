//! Worktree lifecycle and repository refresh engine
//!
//! This crate holds the workflows of the worktree manager:
//!
//! - [`catalog`] discovers repositories under the root and lists branches
//! - [`lifecycle`] creates, lists and deletes worktrees
//! - [`refresh`] decides per repository whether to pull, fetch or skip
//!
//! Git access goes through [`wtm_git::VcsBackend`] and operator interaction
//! through [`Selector`] and [`Notices`], so every workflow can run against
//! fakes.

pub mod catalog;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod notice;
pub mod refresh;
pub mod selector;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::{BranchCatalog, Repository, RepositoryCatalog};
pub use config::{FileConfig, Settings, SettingsOverrides};
pub use error::{Error, Result};
pub use lifecycle::{DeleteOutcome, UnregisterStatus, WorktreeLifecycle, WorktreeListing};
pub use notice::{Notices, SilentNotices};
pub use refresh::{
    FailReason, RefreshOrchestrator, RefreshOutcome, RefreshReport, RefreshTally, SkipReason,
};
pub use selector::{Selector, select};

/// Remote every workflow fetches from and tracks.
pub const DEFAULT_REMOTE: &str = "origin";
