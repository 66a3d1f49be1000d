//! Worktree creation commands

use colored::Colorize;
use wtm_core::{Error, Selector};
use wtm_fs::NormalizedPath;

use super::Session;
use crate::error::Result;

/// Create a worktree checking out an existing branch.
pub fn run_create(session: &Session, repo: Option<&str>, branch: Option<&str>) -> Result<()> {
    let repo = session.repository(repo)?;
    let branch = session.branch(&repo, branch, "Select branch")?;

    let path = session
        .lifecycle()
        .create_from_existing_branch(&repo, &branch)?;
    print_created(&path);
    Ok(())
}

/// Create a worktree on a new branch started from `base`.
pub fn run_new(
    session: &Session,
    repo: Option<&str>,
    base: Option<&str>,
    name: Option<&str>,
) -> Result<()> {
    let repo = session.repository(repo)?;
    let base = session.branch(&repo, base, "Select base branch")?;
    let name = match name {
        Some(name) => name.to_string(),
        None => session
            .selector
            .input("New branch name")?
            .ok_or(Error::NoSelection)?,
    };

    let path = session
        .lifecycle()
        .create_with_new_branch(&repo, &base, &name)?;
    print_created(&path);
    Ok(())
}

fn print_created(path: &NormalizedPath) {
    println!("{} worktree at {}", "Created".green().bold(), path.to_string().cyan());
}
