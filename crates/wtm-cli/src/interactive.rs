//! Terminal implementations of the core's operator collaborators
//!
//! Uses dialoguer for terminal-based interactive selection.

use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input, Select};
use wtm_core::{Notices, Selector};

use crate::error::Result;

/// Prompts on the terminal through dialoguer.
///
/// Escape or `q` cancels a prompt.
#[derive(Default)]
pub struct DialoguerSelector {
    theme: ColorfulTheme,
}

impl DialoguerSelector {
    pub fn new() -> Self {
        Self::default()
    }

    fn pick(&self, prompt: &str, items: &[String], filter: bool) -> Result<Option<usize>> {
        let picked = if filter {
            FuzzySelect::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(items)
                .default(0)
                .interact_opt()?
        } else {
            Select::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(items)
                .default(0)
                .interact_opt()?
        };
        Ok(picked)
    }

    fn text(&self, prompt: &str) -> Result<Option<String>> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(typed_answer(value))
    }

    fn yes_no(&self, prompt: &str) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact_opt()?;
        Ok(answer == Some(true))
    }
}

/// A blank answer means no answer. Anything else is passed on as typed.
fn typed_answer(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

fn prompt_error(e: crate::error::CliError) -> wtm_core::Error {
    wtm_core::Error::Prompt {
        message: e.to_string(),
    }
}

impl Selector for DialoguerSelector {
    fn choose(&self, prompt: &str, items: &[String], filter: bool) -> wtm_core::Result<Option<usize>> {
        self.pick(prompt, items, filter).map_err(prompt_error)
    }

    fn input(&self, prompt: &str) -> wtm_core::Result<Option<String>> {
        self.text(prompt).map_err(prompt_error)
    }

    fn confirm(&self, prompt: &str) -> wtm_core::Result<bool> {
        self.yes_no(prompt).map_err(prompt_error)
    }
}

/// Prints notices to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotices;

impl Notices for ConsoleNotices {
    fn info(&self, message: &str) {
        println!("{} {}", "note:".cyan().bold(), message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }
}
