//! Worktree listing command

use colored::Colorize;

use super::Session;
use crate::error::Result;

/// Print worktrees registered in each repository and every
/// worktree-named directory under the root.
pub fn run_list(session: &Session) -> Result<()> {
    let repos = session.catalog().list();
    let listing = session.lifecycle().list_worktrees(&repos)?;

    if listing.is_empty() {
        println!("{}", "No worktrees found".dimmed());
        return Ok(());
    }

    for (repo, lines) in &listing.attached {
        println!("{}", repo.name.bold());
        for line in lines {
            println!("  {line}");
        }
        println!();
    }

    if !listing.standalone.is_empty() {
        println!("{}", "Worktree directories:".bold());
        for dir in &listing.standalone {
            println!("  {}", dir.cyan());
        }
    }
    Ok(())
}
