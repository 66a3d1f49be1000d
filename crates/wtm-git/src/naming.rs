//! Worktree directory naming
//!
//! A worktree for branch `B` of repository `R` lives in a directory named
//! `R + suffix + B'` where `B'` is `B` with every `/` replaced by `-`. The
//! owning repository is recovered by cutting at the *first* occurrence of the
//! suffix. The mapping is exact iff that first occurrence in `R + suffix` is
//! the appended one: `R` must not contain the suffix, and must not end in a
//! proper prefix of it that the suffix completes (`a-wr` + `-wr-` reads back
//! as `a`). Branch content never matters: `feature-wr-x` after the suffix is
//! simply part of the branch segment.

use crate::{Error, Result};

/// Delimiter placed between the repository name and the branch segment.
pub const DEFAULT_SUFFIX: &str = "-wr-";

/// Forward and reverse mapping between (repository, branch) and directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeNaming {
    suffix: String,
}

impl Default for WorktreeNaming {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl WorktreeNaming {
    /// Create a naming scheme with a custom suffix.
    ///
    /// Changing the suffix after worktrees exist breaks the reverse mapping
    /// for those worktrees.
    pub fn new(suffix: impl Into<String>) -> Result<Self> {
        let suffix = suffix.into();
        if suffix.is_empty() {
            return Err(Error::InvalidSuffix {
                suffix,
                reason: "suffix must not be empty".into(),
            });
        }
        if suffix.contains('/') || suffix.contains('\\') {
            return Err(Error::InvalidSuffix {
                suffix,
                reason: "suffix must not contain path separators".into(),
            });
        }
        Ok(Self { suffix })
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Directory name for `branch` of `repo_name`.
    pub fn worktree_dir_name(&self, repo_name: &str, branch: &str) -> String {
        format!("{}{}{}", repo_name, self.suffix, branch.replace('/', "-"))
    }

    /// Repository name that owns the worktree directory `dir_name`.
    ///
    /// Returns `None` when `dir_name` does not contain the suffix.
    pub fn repo_name_from_worktree_dir<'a>(&self, dir_name: &'a str) -> Option<&'a str> {
        dir_name
            .find(self.suffix.as_str())
            .map(|idx| &dir_name[..idx])
    }

    /// Whether `dir_name` looks like a worktree directory of this scheme.
    pub fn is_worktree_dir(&self, dir_name: &str) -> bool {
        match dir_name.find(self.suffix.as_str()) {
            Some(idx) => idx > 0 && idx + self.suffix.len() < dir_name.len(),
            None => false,
        }
    }

    /// Whether worktrees of `repo_name` would round-trip through this scheme.
    pub fn accepts_repo_name(&self, repo_name: &str) -> bool {
        if repo_name.is_empty() {
            return false;
        }
        let joined = format!("{}{}", repo_name, self.suffix);
        joined.find(self.suffix.as_str()) == Some(repo_name.len())
    }
}
