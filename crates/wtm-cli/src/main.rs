//! Worktree manager CLI
//!
//! Creates, lists, deletes and refreshes git worktrees across a directory
//! of repositories, either through the interactive menu or one subcommand.

mod cli;
mod commands;
mod error;
mod interactive;
mod menu;

use std::io::IsTerminal;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wtm_core::Settings;

use cli::{Cli, Commands};
use commands::Session;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(cli.overrides())?;
    let session = Session::new(settings);

    match cli.command {
        Some(cmd) => match execute_command(&session, cmd) {
            Err(e) if e.is_cancelled() => {
                println!("{}", e.to_string().dimmed());
                Ok(())
            }
            other => other,
        },
        None => {
            if !std::io::stdin().is_terminal() {
                return Err(CliError::user(
                    "The interactive menu needs a terminal. Run `wtm --help` for subcommands.",
                ));
            }
            println!(
                "{} managing {}",
                "wtm".green().bold(),
                session.settings.root().to_string().cyan()
            );
            menu::run(&session)
        }
    }
}

fn init_tracing(verbose: bool) {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    match result {
        Ok(()) => tracing::debug!(verbose, "Tracing initialized"),
        Err(e) => eprintln!("{}: {}", "warning".yellow().bold(), e),
    }
}

fn execute_command(session: &Session, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Create { repo, branch } => {
            commands::run_create(session, repo.as_deref(), branch.as_deref())
        }
        Commands::New { repo, base, name } => {
            commands::run_new(session, repo.as_deref(), base.as_deref(), name.as_deref())
        }
        Commands::Delete { dir, yes } => commands::run_delete(session, dir.as_deref(), yes),
        Commands::List => commands::run_list(session),
        Commands::Fetch { repo } => commands::run_fetch(session, repo.as_deref()),
        Commands::Refresh => commands::run_refresh(session),
    }
}
