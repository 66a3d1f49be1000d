//! Shared git2 helper functions
//!
//! Credential handling, fast-forward logic and worktree lookups used by
//! [`crate::Git2Backend`].

use std::path::Path;

use git2::{
    AnnotatedCommit, Cred, CredentialType, FetchOptions, RemoteCallbacks, Repository, Status,
    StatusOptions, Worktree, build::CheckoutBuilder,
};
use wtm_fs::NormalizedPath;

use crate::{Error, Result, WorktreeEntry};

/// libgit2 keeps calling the credential callback while authentication
/// fails; give up after this many attempts.
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Fetch options wired to the ssh agent and the configured credential helper.
pub(crate) fn fetch_options<'a>() -> FetchOptions<'a> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0;

    callbacks.credentials(move |url, username_from_url, allowed| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str(
                "authentication failed: no usable credentials",
            ));
        }

        if allowed.contains(CredentialType::SSH_KEY)
            && let Some(user) = username_from_url
        {
            return Cred::ssh_key_from_agent(user);
        }

        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            let config = git2::Config::open_default()?;
            return Cred::credential_helper(&config, url, username_from_url);
        }

        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(username_from_url.unwrap_or("git"));
        }

        Cred::default()
    });

    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);
    options
}

/// Fast-forward `refs/heads/<branch>` to `refs/remotes/<remote>/<branch>`.
///
/// When the branch is checked out in `repo`, the working tree is updated
/// with a safe checkout before the ref moves, so local modifications are
/// never overwritten.
pub(crate) fn fast_forward(repo: &Repository, remote: &str, branch: &str) -> Result<()> {
    let tracking = format!("refs/remotes/{remote}/{branch}");
    let upstream = repo
        .find_reference(&tracking)
        .map_err(|_| Error::BranchNotFound {
            name: format!("{remote}/{branch}"),
        })?;
    let upstream_commit = upstream.peel_to_commit()?;
    let annotated: AnnotatedCommit<'_> = repo.find_annotated_commit(upstream_commit.id())?;

    let local_refname = format!("refs/heads/{branch}");
    let mut local = repo
        .find_reference(&local_refname)
        .map_err(|_| Error::BranchNotFound {
            name: branch.to_string(),
        })?;

    let (analysis, _) = repo.merge_analysis_for_ref(&local, &[&annotated])?;

    if analysis.is_up_to_date() {
        tracing::debug!(branch, "Already up to date");
        return Ok(());
    }

    if !analysis.is_fast_forward() {
        let local_id = local
            .target()
            .map(|oid| oid.to_string())
            .unwrap_or_default();
        return Err(Error::CannotFastForward {
            branch: branch.to_string(),
            message: format!(
                "{local_id} cannot be advanced to {} without a merge",
                upstream_commit.id()
            ),
        });
    }

    let head_is_branch = repo
        .head()
        .ok()
        .and_then(|head| head.name().map(|name| name == local_refname))
        .unwrap_or(false);

    if head_is_branch {
        repo.checkout_tree(
            upstream_commit.as_object(),
            Some(CheckoutBuilder::new().safe()),
        )?;
    }

    local.set_target(
        upstream_commit.id(),
        &format!("pull: fast-forward to {}", upstream_commit.id()),
    )?;

    Ok(())
}

/// Whether tracked files in `repo` differ from HEAD (index or working tree).
pub(crate) fn is_dirty(repo: &Repository) -> Result<bool> {
    let mut options = StatusOptions::new();
    options
        .include_untracked(false)
        .include_ignored(false)
        .exclude_submodules(true);

    let statuses = repo.statuses(Some(&mut options))?;
    Ok(statuses
        .iter()
        .any(|entry| entry.status() != Status::CURRENT && !entry.status().is_ignored()))
}

/// Find the linked worktree whose working directory is `target`.
pub(crate) fn find_worktree_by_path(
    repo: &Repository,
    target: &NormalizedPath,
) -> Result<Option<Worktree>> {
    let target = target.canonical();
    for name in repo.worktrees()?.iter().flatten() {
        let worktree = repo.find_worktree(name)?;
        if NormalizedPath::new(worktree.path()).canonical() == target {
            return Ok(Some(worktree));
        }
    }
    Ok(None)
}

/// Prune a stale registration named `name` so a new worktree can reuse it.
///
/// Registrations survive when a worktree directory is deleted by hand; libgit2
/// refuses to add a worktree under a name that is still registered.
pub(crate) fn prune_stale_worktree(repo: &Repository, name: &str) {
    if let Ok(worktree) = repo.find_worktree(name)
        && worktree.validate().is_err()
    {
        tracing::debug!(name, "Pruning stale worktree registration");
        if let Err(e) = worktree.prune(None) {
            tracing::warn!(name, error = %e, "Failed to prune stale worktree registration");
        }
    }
}

/// Describe the checkout of `repo` located at `path`.
pub(crate) fn worktree_entry(repo: &Repository, path: &Path, is_main: bool) -> WorktreeEntry {
    let head = repo.head().ok();
    let branch = head
        .as_ref()
        .filter(|h| h.is_branch())
        .and_then(|h| h.shorthand().map(String::from));
    let short_id = head
        .as_ref()
        .and_then(|h| h.target())
        .map(|oid| oid.to_string().chars().take(7).collect::<String>());

    WorktreeEntry {
        path: NormalizedPath::new(path).to_native(),
        head: short_id,
        branch,
        is_main,
        prunable: !path.exists(),
    }
}
