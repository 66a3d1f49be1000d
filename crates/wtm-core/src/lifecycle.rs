//! Worktree create, list and delete workflows
//!
//! Worktrees live next to the repositories under the root directory and are
//! named `<repo><suffix><branch>`. Nothing is persisted: the directory on
//! disk is the only record of a worktree, and git's own registration is
//! kept in sync by going through [`VcsBackend`].

use std::path::PathBuf;

use wtm_fs::{NormalizedPath, RobustnessConfig, io};
use wtm_git::{SanitizedBranch, VcsBackend, WorktreeSource};

use crate::{
    DEFAULT_REMOTE, Error, Notices, Repository, RepositoryCatalog, Result, Selector, Settings,
};

/// Repositories with linked worktrees plus every worktree-named directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeListing {
    /// Repositories with more than one registered worktree, with one
    /// `git worktree list` style line per worktree
    pub attached: Vec<(Repository, Vec<String>)>,
    /// Root-level directories matching the worktree naming pattern
    pub standalone: Vec<String>,
}

impl WorktreeListing {
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty() && self.standalone.is_empty()
    }
}

/// Result of the unregister phase of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnregisterStatus {
    /// Git no longer knows the worktree
    Unregistered,
    /// The owning repository is not under the root any more
    RepositoryMissing,
    /// Git refused; the message is kept for the operator
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The operator did not confirm; nothing was touched
    Declined,
    Removed {
        unregistered: UnregisterStatus,
        /// The directory survived unregistering and was removed from disk
        fallback_used: bool,
    },
}

/// Creates, lists and deletes worktrees under the configured root.
pub struct WorktreeLifecycle<'a> {
    settings: &'a Settings,
    backend: &'a dyn VcsBackend,
    notices: &'a dyn Notices,
    robustness: RobustnessConfig,
}

impl<'a> WorktreeLifecycle<'a> {
    pub fn new(settings: &'a Settings, backend: &'a dyn VcsBackend, notices: &'a dyn Notices) -> Self {
        Self {
            settings,
            backend,
            notices,
            robustness: RobustnessConfig::default(),
        }
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    /// Check out an existing branch of `repo` in a new worktree.
    ///
    /// When `origin/<branch>` exists the worktree gets a fresh local branch
    /// from it, and a stale local branch of the same name is force deleted
    /// first. A branch that only exists locally is checked out as is.
    pub fn create_from_existing_branch(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<NormalizedPath> {
        self.check_repo_name(repo)?;
        self.fetch_before_create(repo);

        let path = self.vacant_path(repo, branch)?;
        let repo_path = repo.path.as_ref();

        let remote_ref = format!("refs/remotes/{DEFAULT_REMOTE}/{branch}");
        let source = if self.backend.ref_exists(repo_path, &remote_ref)? {
            if self.backend.local_branch_exists(repo_path, branch)? {
                tracing::warn!(
                    repo = %repo.name,
                    branch,
                    "Force deleting local branch to recreate it from {DEFAULT_REMOTE}"
                );
                self.notices.warn(&format!(
                    "Deleting local branch '{branch}' to recreate it from {DEFAULT_REMOTE}/{branch}"
                ));
                self.backend.delete_local_branch(repo_path, branch)?;
            }
            WorktreeSource::NewBranch {
                branch: branch.to_string(),
                start_point: format!("{DEFAULT_REMOTE}/{branch}"),
            }
        } else {
            tracing::debug!(repo = %repo.name, branch, "No remote branch, using local branch");
            WorktreeSource::ExistingBranch {
                branch: branch.to_string(),
            }
        };

        self.add(repo, &path, &source)?;
        Ok(path)
    }

    /// Create a worktree on a new branch named from `raw_name`.
    ///
    /// The name is sanitized first; the operator is told when it changed.
    pub fn create_with_new_branch(
        &self,
        repo: &Repository,
        base_branch: &str,
        raw_name: &str,
    ) -> Result<NormalizedPath> {
        self.check_repo_name(repo)?;
        self.fetch_before_create(repo);

        let Some(clean) = SanitizedBranch::parse(raw_name) else {
            return Err(Error::InvalidBranchName {
                raw: raw_name.to_string(),
            });
        };
        if clean.was_modified() {
            self.notices.info(&format!(
                "Branch name sanitized: '{raw_name}' -> '{clean}'"
            ));
        }

        let path = self.vacant_path(repo, clean.as_str())?;

        let remote_ref = format!("refs/remotes/{DEFAULT_REMOTE}/{base_branch}");
        let start_point = if self.backend.ref_exists(repo.path.as_ref(), &remote_ref)? {
            format!("{DEFAULT_REMOTE}/{base_branch}")
        } else {
            base_branch.to_string()
        };

        let source = WorktreeSource::NewBranch {
            branch: clean.into_string(),
            start_point,
        };
        self.add(repo, &path, &source)?;
        Ok(path)
    }

    /// Worktrees known to git plus worktree-named directories on disk.
    ///
    /// A repository whose worktrees cannot be listed is reported as a
    /// warning and left out.
    pub fn list_worktrees(&self, repos: &[Repository]) -> Result<WorktreeListing> {
        let mut attached = Vec::new();
        for repo in repos {
            match self.backend.list_worktrees(repo.path.as_ref()) {
                Ok(entries) if entries.len() > 1 => {
                    let lines = entries.iter().map(|e| e.display_line()).collect();
                    attached.push((repo.clone(), lines));
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(repo = %repo.name, error = %e, "Cannot list worktrees");
                    self.notices
                        .warn(&format!("Cannot list worktrees of {}: {e}", repo.name));
                }
            }
        }

        Ok(WorktreeListing {
            attached,
            standalone: self.worktree_dirs()?,
        })
    }

    /// Names of root-level directories that follow the worktree pattern.
    ///
    /// Primary clones are left out even when their name matches.
    pub fn worktree_dirs(&self) -> Result<Vec<String>> {
        let root = self.settings.root();
        if !root.is_dir() {
            return Ok(Vec::new());
        }
        Ok(io::child_dir_names(root)?
            .into_iter()
            .filter(|name| !name.starts_with('.') && self.is_worktree_candidate(name))
            .collect())
    }

    /// Delete the worktree directory `dir_name` after confirmation.
    ///
    /// Runs in two phases. *Unregister* asks git to drop the worktree; its
    /// failure is recorded in the outcome. *Ensure absent* then removes
    /// whatever is left on disk, and only its failure is an error.
    pub fn delete_worktree(&self, dir_name: &str, selector: &dyn Selector) -> Result<DeleteOutcome> {
        if !wtm_fs::is_plain_segment(dir_name) || !self.is_worktree_candidate(dir_name) {
            return Err(Error::not_found(format!("worktree '{dir_name}'")));
        }
        let path = self.settings.worktree_path(dir_name);

        if !selector.confirm(&format!("Delete worktree '{dir_name}'?"))? {
            tracing::debug!(dir_name, "Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        let unregistered = self.unregister(dir_name, &path);
        let fallback_used = self.ensure_absent(&path)?;

        tracing::info!(dir_name, ?unregistered, fallback_used, "Deleted worktree");
        Ok(DeleteOutcome::Removed {
            unregistered,
            fallback_used,
        })
    }

    /// Fetch every remote of `repo`, pruning deleted branches.
    pub fn fetch_repository(&self, repo: &Repository) -> Result<()> {
        self.backend.fetch_all_prune(repo.path.as_ref())?;
        tracing::info!(repo = %repo.name, "Fetched all remotes");
        Ok(())
    }

    fn is_worktree_candidate(&self, dir_name: &str) -> bool {
        if !self.settings.naming().is_worktree_dir(dir_name) {
            return false;
        }
        let catalog = RepositoryCatalog::new(self.settings.root().clone());
        if catalog.find(dir_name).is_some() {
            tracing::debug!(dir_name, "Primary clone matches the worktree pattern, ignoring");
            return false;
        }
        true
    }

    fn check_repo_name(&self, repo: &Repository) -> Result<()> {
        let naming = self.settings.naming();
        if naming.accepts_repo_name(&repo.name) {
            Ok(())
        } else {
            Err(Error::AmbiguousRepositoryName {
                name: repo.name.clone(),
                suffix: naming.suffix().to_string(),
            })
        }
    }

    fn fetch_before_create(&self, repo: &Repository) {
        if let Err(e) = self.backend.fetch_all_prune(repo.path.as_ref()) {
            tracing::warn!(repo = %repo.name, error = %e, "Fetch failed, using local refs");
            self.notices
                .warn(&format!("Fetch failed for {}, using local refs: {e}", repo.name));
        }
    }

    fn vacant_path(&self, repo: &Repository, branch: &str) -> Result<NormalizedPath> {
        let dir_name = self.settings.naming().worktree_dir_name(&repo.name, branch);
        let path = self.settings.worktree_path(&dir_name);
        if path.exists() {
            return Err(Error::AlreadyExists {
                path: path.to_native(),
            });
        }
        Ok(path)
    }

    fn add(&self, repo: &Repository, path: &NormalizedPath, source: &WorktreeSource) -> Result<()> {
        let native: PathBuf = path.to_native();
        self.backend.add_worktree(repo.path.as_ref(), &native, source)?;
        tracing::info!(repo = %repo.name, branch = source.branch(), path = %path, "Created worktree");
        Ok(())
    }

    fn unregister(&self, dir_name: &str, path: &NormalizedPath) -> UnregisterStatus {
        let catalog = RepositoryCatalog::new(self.settings.root().clone());
        let repo = self
            .settings
            .naming()
            .repo_name_from_worktree_dir(dir_name)
            .and_then(|name| catalog.find(name));
        let Some(repo) = repo else {
            tracing::debug!(dir_name, "Owning repository not found, skipping unregister");
            return UnregisterStatus::RepositoryMissing;
        };

        match self
            .backend
            .remove_worktree(repo.path.as_ref(), &path.to_native(), true)
        {
            Ok(()) => UnregisterStatus::Unregistered,
            Err(e) => {
                tracing::warn!(repo = %repo.name, dir_name, error = %e, "Unregister failed");
                self.notices
                    .warn(&format!("git could not remove worktree '{dir_name}': {e}"));
                UnregisterStatus::Failed(e.to_string())
            }
        }
    }

    fn ensure_absent(&self, path: &NormalizedPath) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        io::remove_dir_forced(path, self.robustness)?;
        self.notices
            .info(&format!("Removed leftover directory {path}"));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, RecordingNotices, ScriptedSelector};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;
    use wtm_git::WorktreeNaming;

    struct Fixture {
        _dir: TempDir,
        settings: Settings,
        backend: FakeBackend,
        notices: RecordingNotices,
        repo: Repository,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let root = NormalizedPath::new(dir.path()).canonical();
            fs::create_dir_all(root.join("api").join(".git").to_native()).unwrap();

            let backend = FakeBackend::new();
            let repo = backend.repo(root.join("api"));
            Self {
                _dir: dir,
                settings: Settings::new(root, WorktreeNaming::default()),
                backend,
                notices: RecordingNotices::default(),
                repo,
            }
        }

        fn lifecycle(&self) -> WorktreeLifecycle<'_> {
            WorktreeLifecycle::new(&self.settings, &self.backend, &self.notices)
        }

        fn worktree(&self, dir_name: &str) -> NormalizedPath {
            self.settings.worktree_path(dir_name)
        }
    }

    #[test]
    fn test_create_from_remote_branch_recreates_local() {
        let fx = Fixture::new();
        fx.backend.with_repo(&fx.repo.path, |s| {
            s.refs.insert("refs/remotes/origin/feature/x".into());
            s.local.insert("feature/x".into());
        });

        let path = fx
            .lifecycle()
            .create_from_existing_branch(&fx.repo, "feature/x")
            .unwrap();

        assert_eq!(path, fx.worktree("api-wr-feature-x"));
        assert_eq!(
            fx.backend.mutations(),
            vec![
                "fetch_all_prune".to_string(),
                "delete_local_branch feature/x".to_string(),
                format!("add_worktree {} new feature/x from origin/feature/x", path),
            ]
        );
        assert_eq!(fx.notices.warnings.borrow().len(), 1);
        assert!(fx.notices.warnings.borrow()[0].contains("feature/x"));
    }

    #[test]
    fn test_create_from_remote_branch_without_local_does_not_delete() {
        let fx = Fixture::new();
        fx.backend.with_repo(&fx.repo.path, |s| {
            s.refs.insert("refs/remotes/origin/dev".into());
        });

        fx.lifecycle().create_from_existing_branch(&fx.repo, "dev").unwrap();

        assert!(!fx.backend.calls().iter().any(|c| c.starts_with("delete_local_branch")));
        assert!(fx.notices.warnings.borrow().is_empty());
    }

    #[test]
    fn test_create_from_local_only_branch_checks_it_out() {
        let fx = Fixture::new();
        fx.backend.with_repo(&fx.repo.path, |s| {
            s.local.insert("wip".into());
        });

        let path = fx.lifecycle().create_from_existing_branch(&fx.repo, "wip").unwrap();

        assert_eq!(
            fx.backend.mutations().last().cloned(),
            Some(format!("add_worktree {path} existing wip"))
        );
    }

    #[test]
    fn test_create_collision_never_adds() {
        let fx = Fixture::new();
        fs::create_dir(fx.worktree("api-wr-dev").to_native()).unwrap();
        fx.backend.with_repo(&fx.repo.path, |s| {
            s.refs.insert("refs/remotes/origin/dev".into());
            s.local.insert("dev".into());
        });

        let result = fx.lifecycle().create_from_existing_branch(&fx.repo, "dev");

        assert!(matches!(result, Err(Error::AlreadyExists { .. })));
        assert_eq!(fx.backend.mutations(), vec!["fetch_all_prune"]);
    }

    #[test]
    fn test_create_continues_when_fetch_fails() {
        let fx = Fixture::new();
        fx.backend.fail(&fx.repo.path, "fetch_all_prune");
        fx.backend.with_repo(&fx.repo.path, |s| {
            s.local.insert("wip".into());
        });

        let path = fx.lifecycle().create_from_existing_branch(&fx.repo, "wip").unwrap();

        assert!(path.exists());
        assert_eq!(fx.notices.warnings.borrow().len(), 1);
    }

    #[test]
    fn test_create_add_failure_is_collaborator_error() {
        let fx = Fixture::new();
        fx.backend.fail(&fx.repo.path, "add_worktree");

        let result = fx.lifecycle().create_from_existing_branch(&fx.repo, "dev");

        assert!(matches!(result, Err(Error::Collaborator(_))));
        assert!(!fx.worktree("api-wr-dev").exists());
    }

    #[test]
    fn test_create_rejects_ambiguous_repository_name() {
        let fx = Fixture::new();
        let repo = fx.backend.repo(fx.settings.root().join("legacy-wr"));

        let result = fx.lifecycle().create_from_existing_branch(&repo, "main");

        assert!(matches!(
            result,
            Err(Error::AmbiguousRepositoryName { name, .. }) if name == "legacy-wr"
        ));
        assert!(fx.backend.calls().is_empty());
    }

    #[test]
    fn test_new_branch_sanitizes_and_notifies() {
        let fx = Fixture::new();
        fx.backend.with_repo(&fx.repo.path, |s| {
            s.refs.insert("refs/remotes/origin/main".into());
        });

        let path = fx
            .lifecycle()
            .create_with_new_branch(&fx.repo, "main", "  My Feature: fix #1?? ")
            .unwrap();

        assert_eq!(path, fx.worktree("api-wr-My-Feature-fix-#1"));
        assert_eq!(
            *fx.notices.infos.borrow(),
            vec!["Branch name sanitized: '  My Feature: fix #1?? ' -> 'My-Feature-fix-#1'"]
        );
        assert_eq!(
            fx.backend.mutations().last().cloned(),
            Some(format!("add_worktree {path} new My-Feature-fix-#1 from origin/main"))
        );
    }

    #[test]
    fn test_new_branch_clean_name_has_no_notice() {
        let fx = Fixture::new();

        fx.lifecycle()
            .create_with_new_branch(&fx.repo, "main", "feature/login")
            .unwrap();

        assert!(fx.notices.infos.borrow().is_empty());
    }

    #[test]
    fn test_new_branch_from_local_only_base() {
        let fx = Fixture::new();

        let path = fx
            .lifecycle()
            .create_with_new_branch(&fx.repo, "wip", "next")
            .unwrap();

        assert_eq!(
            fx.backend.mutations().last().cloned(),
            Some(format!("add_worktree {path} new next from wip"))
        );
    }

    #[test]
    fn test_new_branch_empty_name_is_invalid() {
        let fx = Fixture::new();

        let result = fx.lifecycle().create_with_new_branch(&fx.repo, "main", " ?*~ ");

        assert!(matches!(result, Err(Error::InvalidBranchName { raw }) if raw == " ?*~ "));
        assert!(!fx.backend.calls().iter().any(|c| c.starts_with("add_worktree")));
    }

    #[test]
    fn test_new_branch_collision_never_adds() {
        let fx = Fixture::new();
        fs::create_dir(fx.worktree("api-wr-next").to_native()).unwrap();

        let result = fx.lifecycle().create_with_new_branch(&fx.repo, "main", "next");

        assert!(matches!(result, Err(Error::AlreadyExists { .. })));
        assert!(!fx.backend.calls().iter().any(|c| c.starts_with("add_worktree")));
    }

    #[test]
    fn test_list_worktrees() {
        let fx = Fixture::new();
        let lone = fx.backend.repo(fx.settings.root().join("lone"));
        fx.lifecycle().create_from_existing_branch(&fx.repo, "dev").unwrap();
        fx.backend.with_repo(&fx.repo.path, |s| {
            s.worktrees.insert(
                0,
                wtm_git::WorktreeEntry {
                    path: fx.repo.path.to_native(),
                    head: Some("1111111".into()),
                    branch: Some("main".into()),
                    is_main: true,
                    prunable: false,
                },
            );
        });
        fs::create_dir(fx.worktree("gone-wr-old").to_native()).unwrap();
        fs::create_dir(fx.worktree("notes").to_native()).unwrap();

        let listing = fx
            .lifecycle()
            .list_worktrees(&[fx.repo.clone(), lone])
            .unwrap();

        assert_eq!(listing.attached.len(), 1);
        assert_eq!(listing.attached[0].0.name, "api");
        assert_eq!(listing.attached[0].1.len(), 2);
        assert!(listing.attached[0].1[1].ends_with("[dev]"));
        assert_eq!(listing.standalone, vec!["api-wr-dev", "gone-wr-old"]);
    }

    #[test]
    fn test_delete_declined_touches_nothing() {
        let fx = Fixture::new();
        fs::create_dir(fx.worktree("api-wr-dev").to_native()).unwrap();
        let selector = ScriptedSelector::new().then_choose(Some(1));

        let outcome = fx.lifecycle().delete_worktree("api-wr-dev", &selector).unwrap();

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert!(fx.backend.calls().is_empty());
        assert!(fx.worktree("api-wr-dev").exists());
        assert_eq!(selector.prompts(), vec!["Delete worktree 'api-wr-dev'?"]);
    }

    #[test]
    fn test_delete_cancelled_touches_nothing() {
        let fx = Fixture::new();
        fs::create_dir(fx.worktree("api-wr-dev").to_native()).unwrap();
        let selector = ScriptedSelector::new().then_choose(None);

        let outcome = fx.lifecycle().delete_worktree("api-wr-dev", &selector).unwrap();

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert!(fx.backend.mutations().is_empty());
    }

    #[test]
    fn test_delete_unregisters_through_git() {
        let fx = Fixture::new();
        let path = fx.lifecycle().create_from_existing_branch(&fx.repo, "dev").unwrap();
        let selector = ScriptedSelector::new().then_choose(Some(0));

        let outcome = fx.lifecycle().delete_worktree("api-wr-dev", &selector).unwrap();

        assert_eq!(
            outcome,
            DeleteOutcome::Removed {
                unregistered: UnregisterStatus::Unregistered,
                fallback_used: false,
            }
        );
        assert!(!path.exists());
        assert_eq!(
            fx.backend.mutations().last().cloned(),
            Some(format!("remove_worktree {path} force=true"))
        );
    }

    #[test]
    fn test_delete_falls_back_when_git_fails() {
        let fx = Fixture::new();
        let path = fx.lifecycle().create_from_existing_branch(&fx.repo, "dev").unwrap();
        fx.backend.fail(&fx.repo.path, "remove_worktree");
        let selector = ScriptedSelector::new().then_choose(Some(0));

        let outcome = fx.lifecycle().delete_worktree("api-wr-dev", &selector).unwrap();

        assert!(matches!(
            outcome,
            DeleteOutcome::Removed {
                unregistered: UnregisterStatus::Failed(_),
                fallback_used: true,
            }
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_orphan_skips_unregister() {
        let fx = Fixture::new();
        let path = fx.worktree("gone-wr-old");
        fs::create_dir(path.to_native()).unwrap();
        fs::write(path.join(".git").to_native(), "gitdir: /nowhere").unwrap();
        let selector = ScriptedSelector::new().then_choose(Some(0));

        let outcome = fx.lifecycle().delete_worktree("gone-wr-old", &selector).unwrap();

        assert_eq!(
            outcome,
            DeleteOutcome::Removed {
                unregistered: UnregisterStatus::RepositoryMissing,
                fallback_used: true,
            }
        );
        assert!(!path.exists());
        assert!(fx.backend.calls().is_empty());
    }

    #[test]
    fn test_delete_rejects_non_worktree_names() {
        let fx = Fixture::new();
        let selector = ScriptedSelector::new().then_choose(Some(0));

        for name in ["api", "../api-wr-x", "-wr-x", ""] {
            let result = fx.lifecycle().delete_worktree(name, &selector);
            assert!(matches!(result, Err(Error::NotFound { .. })), "{name}");
        }
        assert!(selector.prompts().is_empty());
        assert!(fx.settings.root().join("api").exists());
    }

    #[test]
    fn test_delete_refuses_primary_clone_with_worktree_name() {
        let fx = Fixture::new();
        let clone = fx.worktree("tools-wr-legacy");
        fs::create_dir_all(clone.join(".git").to_native()).unwrap();
        let selector = ScriptedSelector::new().then_choose(Some(0));

        let result = fx.lifecycle().delete_worktree("tools-wr-legacy", &selector);

        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert!(selector.prompts().is_empty());
        assert!(clone.join(".git").exists());
        assert!(fx.lifecycle().worktree_dirs().unwrap().is_empty());
    }

    #[test]
    fn test_fetch_repository_surfaces_error() {
        let fx = Fixture::new();
        fx.backend.fail(&fx.repo.path, "fetch_all_prune");

        let result = fx.lifecycle().fetch_repository(&fx.repo);

        assert!(matches!(result, Err(Error::Collaborator(_))));
    }
}
