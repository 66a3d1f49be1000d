//! Repository and branch discovery

use std::collections::BTreeSet;
use std::time::SystemTime;

use wtm_fs::{NormalizedPath, RepoPath, io};
use wtm_git::{BranchKind, BranchRef, VcsBackend};

use crate::Result;

/// A primary clone found directly under the root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub path: NormalizedPath,
    /// Modification time of the `.git` directory
    pub modified: SystemTime,
}

/// Finds repositories under a root directory.
///
/// A directory qualifies when its `.git` entry is a directory. Linked
/// worktrees carry a `.git` *file* and are therefore never listed.
#[derive(Debug, Clone)]
pub struct RepositoryCatalog {
    root: NormalizedPath,
}

impl RepositoryCatalog {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// All repositories, most recently touched first, ties by name.
    ///
    /// A missing or unreadable root yields an empty list.
    pub fn list(&self) -> Vec<Repository> {
        let names = match io::child_dir_names(&self.root) {
            Ok(names) => names,
            Err(e) => {
                tracing::debug!(root = %self.root, error = %e, "Cannot read root directory");
                return Vec::new();
            }
        };

        let mut repos: Vec<Repository> = names
            .iter()
            .filter(|name| !name.starts_with('.'))
            .filter_map(|name| self.load(name))
            .collect();
        repos.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));

        tracing::debug!(root = %self.root, count = repos.len(), "Listed repositories");
        repos
    }

    /// Look up one repository by directory name.
    pub fn find(&self, name: &str) -> Option<Repository> {
        if !wtm_fs::is_plain_segment(name) || name.starts_with('.') {
            return None;
        }
        self.load(name)
    }

    fn load(&self, name: &str) -> Option<Repository> {
        let path = self.root.join(name);
        let git_dir = path.join(RepoPath::GitDir.as_str());
        if !git_dir.is_dir() {
            return None;
        }
        let modified = io::modified_time(&git_dir).unwrap_or(SystemTime::UNIX_EPOCH);
        Some(Repository {
            name: name.to_string(),
            path,
            modified,
        })
    }
}

/// Lists the branches of a repository as short names.
pub struct BranchCatalog<'a> {
    backend: &'a dyn VcsBackend,
}

impl<'a> BranchCatalog<'a> {
    pub fn new(backend: &'a dyn VcsBackend) -> Self {
        Self { backend }
    }

    /// Local and remote branches merged into one sorted set.
    pub fn list(&self, repo: &Repository) -> Result<BTreeSet<String>> {
        let refs = self.backend.list_branches(repo.path.as_ref())?;
        Ok(refs.iter().filter_map(normalize).collect())
    }
}

/// Short name of a branch reference, or `None` for `HEAD`.
///
/// Remote branches lose their `<remote>/` prefix.
pub fn normalize(branch: &BranchRef) -> Option<String> {
    let short = match branch.kind {
        BranchKind::Local => branch.name.as_str(),
        BranchKind::Remote => match branch.name.split_once('/') {
            Some((_, rest)) => rest,
            None => branch.name.as_str(),
        },
    };
    (!short.is_empty() && short != "HEAD").then(|| short.to_string())
}
