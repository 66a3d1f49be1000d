//! Worktree deletion command

use colored::Colorize;
use wtm_core::{DeleteOutcome, Selector, UnregisterStatus, select};

use super::Session;
use crate::error::Result;

/// Confirms without asking, for `--yes`.
struct AssumeYes;

impl Selector for AssumeYes {
    fn choose(&self, _prompt: &str, _items: &[String], _filter: bool) -> wtm_core::Result<Option<usize>> {
        Ok(Some(0))
    }

    fn input(&self, _prompt: &str) -> wtm_core::Result<Option<String>> {
        Ok(None)
    }
}

/// Delete the worktree directory `dir`, or one picked from the root.
pub fn run_delete(session: &Session, dir: Option<&str>, yes: bool) -> Result<()> {
    let lifecycle = session.lifecycle();
    let dir_name = match dir {
        Some(dir) => dir.to_string(),
        None => {
            let dirs = lifecycle.worktree_dirs()?;
            select(
                &session.selector,
                "Select worktree to delete",
                &dirs,
                "worktrees",
                true,
                |d| d.clone(),
            )?
            .clone()
        }
    };

    let outcome = if yes {
        lifecycle.delete_worktree(&dir_name, &AssumeYes)?
    } else {
        lifecycle.delete_worktree(&dir_name, &session.selector)?
    };

    match outcome {
        DeleteOutcome::Declined => println!("{}", "Delete cancelled".dimmed()),
        DeleteOutcome::Removed {
            unregistered,
            fallback_used,
        } => {
            println!("{} {}", "Deleted".green().bold(), dir_name.cyan());
            match unregistered {
                UnregisterStatus::Unregistered => {}
                UnregisterStatus::RepositoryMissing => println!(
                    "  {}",
                    "owning repository not found, removed the directory only".dimmed()
                ),
                UnregisterStatus::Failed(message) => println!(
                    "  {} {}",
                    "git did not unregister it:".yellow(),
                    message
                ),
            }
            if fallback_used {
                tracing::debug!(dir_name, "Directory removed from disk directly");
            }
        }
    }
    Ok(())
}
