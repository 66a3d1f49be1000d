//! Error types for wtm-core

use std::path::PathBuf;

/// Result type for wtm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wtm-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sanitizing the requested branch name left nothing usable
    #[error("Invalid branch name '{raw}': nothing remains after sanitization")]
    InvalidBranchName { raw: String },

    /// The target worktree directory is already taken
    #[error("Worktree path already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// The repository name would not survive the worktree name round trip
    #[error("Repository name '{name}' cannot be used with worktree suffix '{suffix}'")]
    AmbiguousRepositoryName { name: String, suffix: String },

    /// The operator cancelled an interactive choice
    #[error("No selection made")]
    NoSelection,

    /// Nothing available to choose from
    #[error("No {what} found")]
    NotFound { what: String },

    /// Interactive prompt failed
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// The git collaborator failed
    #[error(transparent)]
    Collaborator(#[from] wtm_git::Error),

    /// Filesystem error from wtm-fs
    #[error(transparent)]
    Fs(#[from] wtm_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Errors that end the current action without a failure message.
    pub fn is_silent_abort(&self) -> bool {
        matches!(self, Self::NoSelection | Self::NotFound { .. })
    }
}
