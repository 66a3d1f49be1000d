//! Single-repository fetch command

use colored::Colorize;

use super::Session;
use crate::error::Result;

/// Fetch all remotes of `repo`, or of a repository picked from the root.
pub fn run_fetch(session: &Session, repo: Option<&str>) -> Result<()> {
    let repo = session.repository(repo)?;
    session.lifecycle().fetch_repository(&repo)?;
    println!("{} {}", "Fetched".green().bold(), repo.name.cyan());
    Ok(())
}
