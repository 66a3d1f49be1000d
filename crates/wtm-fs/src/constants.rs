//! Well-known file and directory names.

use std::path::Path;

/// Filesystem markers and paths the worktree manager looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoPath {
    /// The `.git` directory that marks a primary clone
    GitDir,
    /// The application directory under the user config dir
    AppConfigDir,
    /// The settings file inside [`RepoPath::AppConfigDir`]
    ConfigFile,
}

impl RepoPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitDir => ".git",
            Self::AppConfigDir => "wtm",
            Self::ConfigFile => "config.toml",
        }
    }
}

impl AsRef<Path> for RepoPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
