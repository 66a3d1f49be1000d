//! Bulk synchronization of every repository's default branch

use std::fmt;

use wtm_git::VcsBackend;

use crate::{DEFAULT_REMOTE, Repository};

/// Candidate default branches, in order of preference.
const DEFAULT_BRANCHES: [&str; 2] = ["main", "master"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoDefaultBranch,
    UncommittedChanges,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDefaultBranch => write!(f, "no main/master branch"),
            Self::UncommittedChanges => write!(f, "uncommitted changes"),
        }
    }
}

/// Why a repository could not be refreshed. Each variant keeps the
/// collaborator's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    PullFailed(String),
    FetchFailed(String),
    /// The repository state could not be read
    Inspect(String),
}

impl FailReason {
    pub fn detail(&self) -> &str {
        match self {
            Self::PullFailed(message) | Self::FetchFailed(message) | Self::Inspect(message) => {
                message
            }
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PullFailed(_) => write!(f, "pull failed"),
            Self::FetchFailed(_) => write!(f, "fetch failed"),
            Self::Inspect(message) => write!(f, "{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The checked-out default branch was fast-forwarded
    Pulled,
    /// Another branch is checked out; only the default branch was fetched
    Fetched,
    Skipped(SkipReason),
    Failed(FailReason),
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pulled => write!(f, "pulled"),
            Self::Fetched => write!(f, "fetched"),
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Per-outcome counts of a refresh run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshTally {
    pub pulled: usize,
    pub fetched: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RefreshTally {
    pub fn record(&mut self, outcome: &RefreshOutcome) {
        match outcome {
            RefreshOutcome::Pulled => self.pulled += 1,
            RefreshOutcome::Fetched => self.fetched += 1,
            RefreshOutcome::Skipped(_) => self.skipped += 1,
            RefreshOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pulled + self.fetched + self.failed + self.skipped
    }
}

impl fmt::Display for RefreshTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pulled, {} fetched, {} failed, {} skipped",
            self.pulled, self.fetched, self.failed, self.skipped
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    pub outcomes: Vec<(Repository, RefreshOutcome)>,
    pub tally: RefreshTally,
}

/// Decides per repository whether to pull, fetch or skip.
pub struct RefreshOrchestrator<'a> {
    backend: &'a dyn VcsBackend,
}

impl<'a> RefreshOrchestrator<'a> {
    pub fn new(backend: &'a dyn VcsBackend) -> Self {
        Self { backend }
    }

    /// Refresh every repository in order.
    ///
    /// `observer` sees each outcome as soon as it is known. A failing
    /// repository never stops the run.
    pub fn refresh_all(
        &self,
        repos: &[Repository],
        mut observer: impl FnMut(&Repository, &RefreshOutcome),
    ) -> RefreshReport {
        let mut report = RefreshReport::default();
        for repo in repos {
            let outcome = self.refresh_one(repo);
            observer(repo, &outcome);
            report.tally.record(&outcome);
            report.outcomes.push((repo.clone(), outcome));
        }
        tracing::info!(tally = %report.tally, "Refresh finished");
        report
    }

    pub fn refresh_one(&self, repo: &Repository) -> RefreshOutcome {
        let outcome = self
            .decide(repo)
            .unwrap_or_else(|e| RefreshOutcome::Failed(FailReason::Inspect(e.to_string())));

        match &outcome {
            RefreshOutcome::Failed(reason) => {
                tracing::warn!(repo = %repo.name, %reason, detail = reason.detail(), "Refresh failed");
            }
            other => tracing::info!(repo = %repo.name, outcome = %other, "Refreshed"),
        }
        outcome
    }

    fn decide(&self, repo: &Repository) -> wtm_git::Result<RefreshOutcome> {
        let path = repo.path.as_ref();

        let Some(default) = self.default_branch(repo)? else {
            return Ok(RefreshOutcome::Skipped(SkipReason::NoDefaultBranch));
        };

        let current = self.backend.current_branch(path)?;
        if current.as_deref() != Some(default) {
            tracing::debug!(repo = %repo.name, ?current, default, "Not on default branch, fetching");
            return Ok(match self.backend.fetch_branch(path, DEFAULT_REMOTE, default) {
                Ok(()) => RefreshOutcome::Fetched,
                Err(e) => RefreshOutcome::Failed(FailReason::FetchFailed(e.to_string())),
            });
        }

        if self.backend.has_uncommitted_changes(path)? {
            return Ok(RefreshOutcome::Skipped(SkipReason::UncommittedChanges));
        }

        Ok(match self.backend.pull_ff_only(path, DEFAULT_REMOTE, default) {
            Ok(()) => RefreshOutcome::Pulled,
            Err(e) => RefreshOutcome::Failed(FailReason::PullFailed(e.to_string())),
        })
    }

    fn default_branch(&self, repo: &Repository) -> wtm_git::Result<Option<&'static str>> {
        for branch in DEFAULT_BRANCHES {
            let refname = format!("refs/remotes/{DEFAULT_REMOTE}/{branch}");
            if self.backend.ref_exists(repo.path.as_ref(), &refname)? {
                return Ok(Some(branch));
            }
        }
        Ok(None)
    }
}
