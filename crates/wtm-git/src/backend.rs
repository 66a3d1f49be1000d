//! Version-control collaborator interface

use std::path::{Path, PathBuf};

use crate::Result;

/// Whether a branch reference is local or remote-tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Local,
    Remote,
}

/// A branch as reported by git, before normalization.
///
/// Remote branches carry their remote prefix (`origin/feature`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
    pub kind: BranchKind,
}

impl BranchRef {
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: BranchKind::Local,
        }
    }

    pub fn remote(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: BranchKind::Remote,
        }
    }
}

/// What a new worktree is checked out to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorktreeSource {
    /// Create `branch` at `start_point` (e.g. `origin/main`) and check it out.
    NewBranch { branch: String, start_point: String },
    /// Check out an existing local branch.
    ExistingBranch { branch: String },
}

impl WorktreeSource {
    pub fn branch(&self) -> &str {
        match self {
            Self::NewBranch { branch, .. } | Self::ExistingBranch { branch } => branch,
        }
    }
}

/// One registered worktree of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeEntry {
    pub path: PathBuf,
    /// Abbreviated commit id of HEAD, if it could be resolved
    pub head: Option<String>,
    /// Checked-out branch, `None` when detached or unreadable
    pub branch: Option<String>,
    /// Whether this is the primary checkout
    pub is_main: bool,
    /// Registered but the working directory is gone or unreadable
    pub prunable: bool,
}

impl WorktreeEntry {
    /// Render the entry the way `git worktree list` does.
    pub fn display_line(&self) -> String {
        let head = self.head.as_deref().unwrap_or("0000000");
        let target = match &self.branch {
            Some(branch) => format!("[{branch}]"),
            None => "(detached HEAD)".to_string(),
        };
        let mut line = format!("{}  {} {}", self.path.display(), head, target);
        if self.prunable {
            line.push_str(" prunable");
        }
        line
    }
}

/// Version-control operations the core delegates to.
///
/// Every call names the repository explicitly; implementations must never
/// depend on the process working directory.
pub trait VcsBackend {
    /// List local and remote-tracking branches.
    fn list_branches(&self, repo: &Path) -> Result<Vec<BranchRef>>;

    /// Fetch every configured remote, pruning deleted remote branches.
    fn fetch_all_prune(&self, repo: &Path) -> Result<()>;

    /// Fetch a single branch from `remote`, updating its tracking ref.
    fn fetch_branch(&self, repo: &Path, remote: &str, branch: &str) -> Result<()>;

    /// Fetch `branch` from `remote` and fast-forward the local branch.
    ///
    /// Fails without touching the working tree when a fast-forward is not
    /// possible.
    fn pull_ff_only(&self, repo: &Path, remote: &str, branch: &str) -> Result<()>;

    /// Whether a fully qualified ref (`refs/remotes/origin/main`) exists.
    fn ref_exists(&self, repo: &Path, refname: &str) -> Result<bool>;

    fn local_branch_exists(&self, repo: &Path, branch: &str) -> Result<bool>;

    /// Delete a local branch regardless of merge state.
    fn delete_local_branch(&self, repo: &Path, branch: &str) -> Result<()>;

    /// Currently checked-out branch, `None` when HEAD is detached or unborn.
    fn current_branch(&self, repo: &Path) -> Result<Option<String>>;

    /// Whether tracked files have staged or unstaged modifications.
    ///
    /// Untracked files do not count.
    fn has_uncommitted_changes(&self, repo: &Path) -> Result<bool>;

    fn add_worktree(&self, repo: &Path, path: &Path, source: &WorktreeSource) -> Result<()>;

    /// Unregister the worktree at `path` and remove its directory.
    fn remove_worktree(&self, repo: &Path, path: &Path, force: bool) -> Result<()>;

    /// Primary checkout followed by every linked worktree.
    fn list_worktrees(&self, repo: &Path) -> Result<Vec<WorktreeEntry>>;
}
