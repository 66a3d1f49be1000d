//! Interactive main menu

use colored::Colorize;
use wtm_core::Selector;

use crate::commands::{self, Session};
use crate::error::Result;

/// Entries of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    CreateFromBranch,
    CreateNewBranch,
    Delete,
    List,
    Fetch,
    RefreshAll,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 7] = [
        Self::CreateFromBranch,
        Self::CreateNewBranch,
        Self::Delete,
        Self::List,
        Self::Fetch,
        Self::RefreshAll,
        Self::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::CreateFromBranch => "Create worktree from existing branch",
            Self::CreateNewBranch => "Create worktree with new branch",
            Self::Delete => "Delete worktree",
            Self::List => "List worktrees",
            Self::Fetch => "Fetch one repository",
            Self::RefreshAll => "Refresh all repositories",
            Self::Exit => "Exit",
        }
    }

    /// Menu line with its 1-based number.
    pub fn numbered(self, index: usize) -> String {
        format!("{}. {}", index + 1, self.label())
    }

    fn run(self, session: &Session) -> Result<()> {
        match self {
            Self::CreateFromBranch => commands::run_create(session, None, None),
            Self::CreateNewBranch => commands::run_new(session, None, None, None),
            Self::Delete => commands::run_delete(session, None, false),
            Self::List => commands::run_list(session),
            Self::Fetch => commands::run_fetch(session, None),
            Self::RefreshAll => commands::run_refresh(session),
            Self::Exit => Ok(()),
        }
    }
}

/// Show the menu until the operator exits or cancels it.
///
/// A failing action is reported and the menu shown again.
pub fn run(session: &Session) -> Result<()> {
    let labels: Vec<String> = MenuAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| action.numbered(i))
        .collect();

    loop {
        println!();
        let choice = session
            .selector
            .choose("What would you like to do?", &labels, false)?;
        let Some(action) = choice.and_then(|i| MenuAction::ALL.get(i).copied()) else {
            return Ok(());
        };
        if action == MenuAction::Exit {
            return Ok(());
        }

        tracing::debug!(?action, "Menu action selected");
        if let Err(e) = action.run(session) {
            report(&e);
        }
    }
}

pub fn report(e: &crate::error::CliError) {
    if e.is_silent_abort() {
        println!("{}", e.to_string().dimmed());
    } else {
        eprintln!("{}: {}", "error".red().bold(), e);
    }
}
