//! Error types for wtm-git

use std::path::PathBuf;

/// Result type for wtm-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wtm-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] wtm_fs::Error),

    #[error("Not a git repository: {path}: {source}")]
    NotARepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Branch '{name}' not found")]
    BranchNotFound { name: String },

    #[error("Fetch from '{remote}' failed: {message}")]
    FetchFailed { remote: String, message: String },

    #[error("Cannot fast-forward '{branch}': {message}")]
    CannotFastForward { branch: String, message: String },

    #[error("Could not create worktree at {path}: {message}")]
    WorktreeAdd { path: PathBuf, message: String },

    #[error("No worktree registered at {path}")]
    WorktreeNotFound { path: PathBuf },

    #[error("Worktree at {path} has uncommitted changes")]
    WorktreeDirty { path: PathBuf },

    #[error("Invalid worktree suffix '{suffix}': {reason}")]
    InvalidSuffix { suffix: String, reason: String },
}
