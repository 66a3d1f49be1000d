//! [`TestWorkspace`]: a root directory of clones sharing bare remotes.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git::{clone, commit_file, configure_identity, git, init_bare};

/// A temporary root directory of clones, each with a bare `origin`.
///
/// Bare remotes live in a separate temporary directory so repository
/// discovery under [`TestWorkspace::root`] only sees the clones.
pub struct TestWorkspace {
    root: TempDir,
    remotes: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
            remotes: TempDir::new().unwrap(),
        }
    }

    /// Directory repositories and worktrees are discovered in.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Path of the bare remote backing `name`.
    pub fn origin(&self, name: &str) -> PathBuf {
        self.remotes.path().join(format!("{name}.git"))
    }

    /// Path of the clone `name` under the root.
    pub fn repo(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Create a bare origin with one commit on `main` and clone it as `name`.
    ///
    /// The clone is on `main`, tracks `origin/main` and has a clean tree.
    pub fn add_repo(&self, name: &str) -> PathBuf {
        self.add_repo_with_default(name, "main")
    }

    /// Like [`TestWorkspace::add_repo`] with a custom trunk name.
    pub fn add_repo_with_default(&self, name: &str, default_branch: &str) -> PathBuf {
        let origin = self.origin(name);
        init_bare(&origin);
        git(&origin, &["symbolic-ref", "HEAD", &format!("refs/heads/{default_branch}")]);

        let seed = self.remotes.path().join(format!("{name}-seed"));
        fs::create_dir_all(&seed).unwrap();
        git(&seed, &["init", "--quiet"]);
        configure_identity(&seed);
        git(&seed, &["checkout", "--quiet", "-b", default_branch]);
        commit_file(&seed, "README.md", "# Test", "Initial commit");
        let origin_str = origin.to_str().expect("utf-8 origin path");
        git(&seed, &["remote", "add", "origin", origin_str]);
        git(&seed, &["push", "--quiet", "origin", default_branch]);

        let dest = self.repo(name);
        clone(&origin, &dest);
        dest
    }

    /// Push a new commit to `branch` of `name`'s origin from a side clone.
    ///
    /// Simulates a teammate pushing; the clone under the root does not see
    /// the commit until it fetches.
    pub fn push_upstream(&self, name: &str, branch: &str, file: &str) -> String {
        let side = self.remotes.path().join(format!("{name}-side-{branch}").replace('/', "-"));
        if !side.exists() {
            clone(&self.origin(name), &side);
        }
        git(&side, &["fetch", "--quiet", "origin"]);
        let remote_ref = format!("origin/{branch}");
        let has_remote = std::process::Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", &remote_ref])
            .current_dir(&side)
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if has_remote {
            git(&side, &["checkout", "--quiet", "-B", branch, &remote_ref]);
        } else {
            git(&side, &["checkout", "--quiet", "-B", branch]);
        }
        commit_file(&side, file, &format!("change to {file}"), &format!("Update {file}"));
        git(&side, &["push", "--quiet", "origin", branch]);
        git(&side, &["rev-parse", "HEAD"])
    }
}
