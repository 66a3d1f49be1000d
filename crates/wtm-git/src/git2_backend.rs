//! [`VcsBackend`] implemented with libgit2

use std::path::Path;

use git2::{BranchType, ErrorCode, FetchPrune, Repository, WorktreeAddOptions, WorktreePruneOptions};
use wtm_fs::NormalizedPath;

use crate::{
    BranchRef, Error, Result, VcsBackend, WorktreeEntry, WorktreeSource, backend::BranchKind,
    helpers,
};

/// Git collaborator backed by `git2`.
///
/// Stateless: every call opens the repository it is given, so no handle is
/// shared between repositories.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Backend;

impl Git2Backend {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, path: &Path) -> Result<Repository> {
        Repository::open(path).map_err(|source| Error::NotARepository {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_missing(e: &git2::Error) -> bool {
    matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec)
}

impl VcsBackend for Git2Backend {
    fn list_branches(&self, repo_path: &Path) -> Result<Vec<BranchRef>> {
        let repo = self.open(repo_path)?;
        let mut branches = Vec::new();

        for item in repo.branches(None)? {
            let (branch, branch_type) = item?;
            let Some(name) = branch.name()? else {
                continue;
            };
            let kind = match branch_type {
                BranchType::Local => BranchKind::Local,
                BranchType::Remote => BranchKind::Remote,
            };
            branches.push(BranchRef {
                name: name.to_string(),
                kind,
            });
        }

        Ok(branches)
    }

    fn fetch_all_prune(&self, repo_path: &Path) -> Result<()> {
        let repo = self.open(repo_path)?;
        let remotes = repo.remotes()?;
        let mut first_error = None;

        for name in remotes.iter().flatten() {
            tracing::debug!(repo = %repo_path.display(), remote = name, "Fetching with prune");
            let mut remote = repo.find_remote(name)?;
            let mut options = helpers::fetch_options();
            options.prune(FetchPrune::On);

            if let Err(e) = remote.fetch(&[] as &[&str], Some(&mut options), None) {
                tracing::warn!(remote = name, error = %e, "Fetch failed");
                first_error.get_or_insert(Error::FetchFailed {
                    remote: name.to_string(),
                    message: e.message().to_string(),
                });
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fetch_branch(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        let repo = self.open(repo_path)?;
        let mut handle = repo.find_remote(remote).map_err(|_| Error::RemoteNotFound {
            name: remote.to_string(),
        })?;

        let refspec = format!("+refs/heads/{branch}:refs/remotes/{remote}/{branch}");
        tracing::debug!(repo = %repo_path.display(), %refspec, "Fetching branch");

        let mut options = helpers::fetch_options();
        handle
            .fetch(&[refspec.as_str()], Some(&mut options), None)
            .map_err(|e| Error::FetchFailed {
                remote: remote.to_string(),
                message: e.message().to_string(),
            })
    }

    fn pull_ff_only(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        self.fetch_branch(repo_path, remote, branch)?;
        let repo = self.open(repo_path)?;
        helpers::fast_forward(&repo, remote, branch)
    }

    fn ref_exists(&self, repo_path: &Path, refname: &str) -> Result<bool> {
        let repo = self.open(repo_path)?;
        match repo.find_reference(refname) {
            Ok(_) => Ok(true),
            Err(e) if is_missing(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn local_branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool> {
        let repo = self.open(repo_path)?;
        match repo.find_branch(branch, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if is_missing(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn delete_local_branch(&self, repo_path: &Path, branch: &str) -> Result<()> {
        let repo = self.open(repo_path)?;
        let mut handle =
            repo.find_branch(branch, BranchType::Local)
                .map_err(|_| Error::BranchNotFound {
                    name: branch.to_string(),
                })?;
        handle.delete()?;
        Ok(())
    }

    fn current_branch(&self, repo_path: &Path) -> Result<Option<String>> {
        let repo = self.open(repo_path)?;
        match repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(String::from)),
            Ok(_) => Ok(None),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn has_uncommitted_changes(&self, repo_path: &Path) -> Result<bool> {
        let repo = self.open(repo_path)?;
        helpers::is_dirty(&repo)
    }

    fn add_worktree(&self, repo_path: &Path, path: &Path, source: &WorktreeSource) -> Result<()> {
        let repo = self.open(repo_path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::WorktreeAdd {
                path: path.to_path_buf(),
                message: "worktree path has no usable directory name".into(),
            })?;

        helpers::prune_stale_worktree(&repo, name);

        let reference = match source {
            WorktreeSource::NewBranch {
                branch,
                start_point,
            } => {
                let commit = repo
                    .revparse_single(start_point)
                    .and_then(|object| object.peel_to_commit())
                    .map_err(|_| Error::BranchNotFound {
                        name: start_point.clone(),
                    })?;
                let mut created = repo.branch(branch, &commit, false)?;
                if let Err(e) = created.set_upstream(Some(start_point.as_str())) {
                    tracing::debug!(branch, start_point, error = %e, "Could not set upstream");
                }
                created.into_reference()
            }
            WorktreeSource::ExistingBranch { branch } => repo
                .find_branch(branch, BranchType::Local)
                .map_err(|_| Error::BranchNotFound {
                    name: branch.clone(),
                })?
                .into_reference(),
        };

        tracing::debug!(
            repo = %repo_path.display(),
            path = %path.display(),
            branch = source.branch(),
            "Adding worktree"
        );

        let mut options = WorktreeAddOptions::new();
        options.reference(Some(&reference));
        repo.worktree(name, path, Some(&options))
            .map_err(|e| Error::WorktreeAdd {
                path: path.to_path_buf(),
                message: e.message().to_string(),
            })?;

        Ok(())
    }

    fn remove_worktree(&self, repo_path: &Path, path: &Path, force: bool) -> Result<()> {
        let repo = self.open(repo_path)?;
        let worktree = helpers::find_worktree_by_path(&repo, &NormalizedPath::new(path))?
            .ok_or_else(|| Error::WorktreeNotFound {
                path: path.to_path_buf(),
            })?;

        if !force
            && let Ok(worktree_repo) = Repository::open_from_worktree(&worktree)
            && helpers::is_dirty(&worktree_repo)?
        {
            return Err(Error::WorktreeDirty {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(path = %path.display(), force, "Removing worktree");

        let mut options = WorktreePruneOptions::new();
        options.valid(true).locked(force).working_tree(true);
        worktree.prune(Some(&mut options))?;

        Ok(())
    }

    fn list_worktrees(&self, repo_path: &Path) -> Result<Vec<WorktreeEntry>> {
        let repo = self.open(repo_path)?;
        let mut entries = Vec::new();

        if let Some(workdir) = repo.workdir() {
            entries.push(helpers::worktree_entry(&repo, workdir, true));
        }

        for name in repo.worktrees()?.iter().flatten() {
            let worktree = repo.find_worktree(name)?;
            let entry = match Repository::open_from_worktree(&worktree) {
                Ok(worktree_repo) => helpers::worktree_entry(&worktree_repo, worktree.path(), false),
                Err(_) => WorktreeEntry {
                    path: worktree.path().to_path_buf(),
                    head: None,
                    branch: None,
                    is_main: false,
                    prunable: true,
                },
            };
            entries.push(entry);
        }

        Ok(entries)
    }
}
