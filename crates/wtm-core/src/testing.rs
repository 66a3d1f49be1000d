//! In-memory collaborators for unit tests

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use wtm_fs::NormalizedPath;
use wtm_git::{BranchRef, VcsBackend, WorktreeEntry, WorktreeSource};

use crate::{Notices, Repository, Result, Selector};

/// Operations that change repository or worktree state.
const MUTATIONS: &[&str] = &[
    "fetch_all_prune",
    "fetch_branch",
    "pull_ff_only",
    "delete_local_branch",
    "add_worktree",
    "remove_worktree",
];

#[derive(Debug, Default)]
pub struct RepoState {
    pub branches: Vec<BranchRef>,
    pub refs: HashSet<String>,
    pub local: HashSet<String>,
    pub current: Option<String>,
    pub dirty: bool,
    pub worktrees: Vec<WorktreeEntry>,
    pub failing: HashSet<&'static str>,
}

/// Scriptable [`VcsBackend`] that records every call.
///
/// `add_worktree` creates the target directory on disk and
/// `remove_worktree` deletes it, so filesystem checks in the workflows see
/// the same effects as with real git.
#[derive(Debug, Default)]
pub struct FakeBackend {
    repos: RefCell<HashMap<PathBuf, RepoState>>,
    calls: RefCell<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository at `path` and return its catalog entry.
    pub fn repo(&self, path: impl Into<NormalizedPath>) -> Repository {
        let path = path.into();
        self.repos
            .borrow_mut()
            .entry(key(path.as_ref()))
            .or_default();
        Repository {
            name: path.file_name().unwrap_or_default().to_string(),
            path,
            modified: SystemTime::UNIX_EPOCH,
        }
    }

    pub fn with_repo(&self, path: &NormalizedPath, f: impl FnOnce(&mut RepoState)) {
        let mut repos = self.repos.borrow_mut();
        f(repos.entry(key(path.as_ref())).or_default());
    }

    /// Make operation `op` fail for the repository at `path`.
    pub fn fail(&self, path: &NormalizedPath, op: &'static str) {
        self.with_repo(path, |state| {
            state.failing.insert(op);
        });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| MUTATIONS.iter().any(|m| call.starts_with(m)))
            .collect()
    }

    fn call<T>(
        &self,
        op: &'static str,
        repo: &Path,
        detail: &str,
        f: impl FnOnce(&mut RepoState) -> T,
    ) -> wtm_git::Result<T> {
        let entry = if detail.is_empty() {
            op.to_string()
        } else {
            format!("{op} {detail}")
        };
        self.calls.borrow_mut().push(entry);

        let mut repos = self.repos.borrow_mut();
        let Some(state) = repos.get_mut(&key(repo)) else {
            return Err(failure(repo, "not a repository"));
        };
        if state.failing.contains(op) {
            return Err(failure(repo, &format!("{op} failed")));
        }
        Ok(f(state))
    }
}

fn key(path: &Path) -> PathBuf {
    path.to_path_buf()
}

fn failure(repo: &Path, message: &str) -> wtm_git::Error {
    wtm_git::Error::Fs(wtm_fs::Error::io(repo, std::io::Error::other(message.to_string())))
}

impl VcsBackend for FakeBackend {
    fn list_branches(&self, repo: &Path) -> wtm_git::Result<Vec<BranchRef>> {
        self.call("list_branches", repo, "", |s| s.branches.clone())
    }

    fn fetch_all_prune(&self, repo: &Path) -> wtm_git::Result<()> {
        self.call("fetch_all_prune", repo, "", |_| ())
    }

    fn fetch_branch(&self, repo: &Path, remote: &str, branch: &str) -> wtm_git::Result<()> {
        self.call("fetch_branch", repo, &format!("{remote} {branch}"), |_| ())
    }

    fn pull_ff_only(&self, repo: &Path, remote: &str, branch: &str) -> wtm_git::Result<()> {
        self.call("pull_ff_only", repo, &format!("{remote} {branch}"), |_| ())
    }

    fn ref_exists(&self, repo: &Path, refname: &str) -> wtm_git::Result<bool> {
        self.call("ref_exists", repo, refname, |s| s.refs.contains(refname))
    }

    fn local_branch_exists(&self, repo: &Path, branch: &str) -> wtm_git::Result<bool> {
        self.call("local_branch_exists", repo, branch, |s| s.local.contains(branch))
    }

    fn delete_local_branch(&self, repo: &Path, branch: &str) -> wtm_git::Result<()> {
        self.call("delete_local_branch", repo, branch, |s| {
            s.local.remove(branch);
        })
    }

    fn current_branch(&self, repo: &Path) -> wtm_git::Result<Option<String>> {
        self.call("current_branch", repo, "", |s| s.current.clone())
    }

    fn has_uncommitted_changes(&self, repo: &Path) -> wtm_git::Result<bool> {
        self.call("has_uncommitted_changes", repo, "", |s| s.dirty)
    }

    fn add_worktree(
        &self,
        repo: &Path,
        path: &Path,
        source: &WorktreeSource,
    ) -> wtm_git::Result<()> {
        let detail = match source {
            WorktreeSource::NewBranch {
                branch,
                start_point,
            } => format!("{} new {branch} from {start_point}", path.display()),
            WorktreeSource::ExistingBranch { branch } => {
                format!("{} existing {branch}", path.display())
            }
        };
        self.call("add_worktree", repo, &detail, |s| {
            s.local.insert(source.branch().to_string());
            s.worktrees.push(WorktreeEntry {
                path: path.to_path_buf(),
                head: Some("abc1234".into()),
                branch: Some(source.branch().to_string()),
                is_main: false,
                prunable: false,
            });
        })?;
        std::fs::create_dir_all(path).map_err(|e| wtm_fs::Error::io(path, e))?;
        Ok(())
    }

    fn remove_worktree(&self, repo: &Path, path: &Path, force: bool) -> wtm_git::Result<()> {
        let detail = format!("{} force={force}", path.display());
        self.call("remove_worktree", repo, &detail, |s| {
            s.worktrees.retain(|w| w.path != path);
        })?;
        if path.exists() {
            std::fs::remove_dir_all(path).map_err(|e| wtm_fs::Error::io(path, e))?;
        }
        Ok(())
    }

    fn list_worktrees(&self, repo: &Path) -> wtm_git::Result<Vec<WorktreeEntry>> {
        self.call("list_worktrees", repo, "", |s| s.worktrees.clone())
    }
}

/// [`Selector`] that replays scripted answers and records prompts.
///
/// Running out of answers behaves like cancelling.
#[derive(Debug, Default)]
pub struct ScriptedSelector {
    choices: RefCell<VecDeque<Option<usize>>>,
    inputs: RefCell<VecDeque<Option<String>>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_choose(self, answer: Option<usize>) -> Self {
        self.choices.borrow_mut().push_back(answer);
        self
    }

    pub fn then_input(self, answer: Option<&str>) -> Self {
        self.inputs
            .borrow_mut()
            .push_back(answer.map(str::to_string));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Selector for ScriptedSelector {
    fn choose(&self, prompt: &str, _items: &[String], _filter: bool) -> Result<Option<usize>> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.choices.borrow_mut().pop_front().flatten())
    }

    fn input(&self, prompt: &str) -> Result<Option<String>> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.inputs.borrow_mut().pop_front().flatten())
    }
}

/// [`Notices`] that keeps every message.
#[derive(Debug, Default)]
pub struct RecordingNotices {
    pub infos: RefCell<Vec<String>>,
    pub warnings: RefCell<Vec<String>>,
}

impl Notices for RecordingNotices {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}
