//! Settings Manager CLI
//!
//! Reads and writes typed project and user settings from the command line.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::SettingsContext;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Absorbed failures are logged as warnings, so keep them visible
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    match cli.command.clone() {
        Some(cmd) => execute_command(&SettingsContext::from_cli(&cli)?, cmd),
        None => {
            // No command provided - show help hint
            println!("{} Settings Manager CLI", "settings".green().bold());
            println!();
            println!("Run {} for available commands.", "settings --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(context: &SettingsContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Get {
            key,
            kind,
            scope,
            default,
        } => commands::run_get(context, &key, kind, scope, default.as_deref()),
        Commands::Set {
            key,
            value,
            kind,
            scope,
        } => commands::run_set(context, &key, &value, kind, scope),
        Commands::Delete { key, kind, scope } => commands::run_delete(context, &key, kind, scope),
        Commands::Show { json } => commands::run_show(context, json),
        Commands::Path { scope } => commands::run_path(context, scope),
    }
}
