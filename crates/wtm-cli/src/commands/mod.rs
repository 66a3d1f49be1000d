//! Command implementations for wtm-cli

pub mod create;
pub mod delete;
pub mod fetch;
pub mod list;
pub mod refresh;

pub use create::{run_create, run_new};
pub use delete::run_delete;
pub use fetch::run_fetch;
pub use list::run_list;
pub use refresh::run_refresh;

use wtm_core::{
    BranchCatalog, Error, Repository, RepositoryCatalog, Settings, WorktreeLifecycle, select,
};
use wtm_git::Git2Backend;

use crate::error::Result;
use crate::interactive::{ConsoleNotices, DialoguerSelector};

/// Everything one invocation works with.
pub struct Session {
    pub settings: Settings,
    pub backend: Git2Backend,
    pub selector: DialoguerSelector,
    pub notices: ConsoleNotices,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            backend: Git2Backend::new(),
            selector: DialoguerSelector::new(),
            notices: ConsoleNotices,
        }
    }

    pub fn lifecycle(&self) -> WorktreeLifecycle<'_> {
        WorktreeLifecycle::new(&self.settings, &self.backend, &self.notices)
    }

    pub fn catalog(&self) -> RepositoryCatalog {
        RepositoryCatalog::new(self.settings.root().clone())
    }

    /// The named repository, or one picked from the catalog.
    pub fn repository(&self, name: Option<&str>) -> Result<Repository> {
        let catalog = self.catalog();
        if let Some(name) = name {
            return catalog
                .find(name)
                .ok_or_else(|| Error::not_found(format!("repository '{name}'")).into());
        }
        let repos = catalog.list();
        let repo = select(
            &self.selector,
            "Select repository",
            &repos,
            "repositories",
            true,
            |r| r.name.clone(),
        )?;
        Ok(repo.clone())
    }

    /// `name`, or a branch picked from `repo`'s local and remote branches.
    pub fn branch(&self, repo: &Repository, name: Option<&str>, prompt: &str) -> Result<String> {
        if let Some(name) = name {
            return Ok(name.to_string());
        }
        let branches: Vec<String> = BranchCatalog::new(&self.backend)
            .list(repo)?
            .into_iter()
            .collect();
        let branch = select(&self.selector, prompt, &branches, "branches", true, |b| b.clone())?;
        Ok(branch.clone())
    }
}
