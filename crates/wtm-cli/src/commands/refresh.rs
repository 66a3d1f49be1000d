//! Bulk refresh command

use colored::{ColoredString, Colorize};
use wtm_core::{Error, RefreshOrchestrator, RefreshOutcome};

use super::Session;
use crate::error::Result;

/// Pull or fetch the default branch of every repository under the root.
pub fn run_refresh(session: &Session) -> Result<()> {
    let repos = session.catalog().list();
    if repos.is_empty() {
        return Err(Error::not_found("repositories").into());
    }

    let width = repos.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let report = RefreshOrchestrator::new(&session.backend).refresh_all(&repos, |repo, outcome| {
        println!("  {:<width$}  {}", repo.name, styled(outcome));
        if let RefreshOutcome::Failed(reason) = outcome
            && reason.detail() != reason.to_string()
        {
            println!("  {:<width$}  {}", "", reason.detail().dimmed());
        }
    });

    println!();
    println!("{} {}", "Refresh:".bold(), report.tally);
    Ok(())
}

fn styled(outcome: &RefreshOutcome) -> ColoredString {
    let text = outcome.to_string();
    match outcome {
        RefreshOutcome::Pulled => text.green(),
        RefreshOutcome::Fetched => text.cyan(),
        RefreshOutcome::Skipped(_) => text.yellow(),
        RefreshOutcome::Failed(_) => text.red(),
    }
}
