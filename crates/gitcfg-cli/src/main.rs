//! gitcfg CLI
//!
//! Reads and updates configuration stored at a dedicated git reference.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};
use gitcfg_core::{GitConfigOverrides, Settings};
use gitcfg_store::GitStoreProvider;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not initialize logging: {}", "warning".yellow(), e);
    }
    tracing::debug!(repo = %cli.repo.display(), "Starting gitcfg");

    let Some(command) = cli.command else {
        println!("{} replication configuration in git", "gitcfg".green().bold());
        println!();
        println!("Run {} for available commands.", "gitcfg --help".cyan());
        return Ok(());
    };

    let settings = Settings::resolve(cli.settings.as_deref())?;
    let overrides = GitConfigOverrides::open(cli.repo, settings);
    execute_command(&overrides, command)
}

fn execute_command(overrides: &GitConfigOverrides<GitStoreProvider>, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Get { json } => commands::run_get(overrides, json),
        Commands::Set { key, values } => commands::run_set(overrides, &key, &values),
        Commands::Apply { file } => commands::run_apply(overrides, &file),
        Commands::Version => commands::run_version(overrides),
        Commands::Log { max_count, json } => {
            if max_count == 0 {
                return Err(CliError::user("--max-count must be at least 1"));
            }
            commands::run_log(overrides, max_count, json)
        }
    }
}
