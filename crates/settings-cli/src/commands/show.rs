//! show and path commands

use colored::Colorize;
use settings_core::{Repository, SettingsRepository, SettingsScope};

use crate::context::SettingsContext;
use crate::error::Result;

/// List the repositories and every entry in the project settings file.
pub fn run_show(context: &SettingsContext, json: bool) -> Result<()> {
    let mut settings = context.open()?;

    let repositories: Vec<serde_json::Value> = settings
        .repositories()
        .iter()
        .map(|repo| {
            serde_json::json!({
                "scope": repo.scope(),
                "name": repo.name(),
                "path": location(context, repo),
            })
        })
        .collect();

    let entries: Vec<serde_json::Value> = settings
        .get_repository_mut(SettingsScope::Project, Some(context.name.as_str()))
        .and_then(Repository::as_file_mut)
        .map(|repo| {
            repo.dictionary()
                .entries()
                .map(|(key, value)| {
                    serde_json::json!({
                        "type": key.type_name,
                        "key": key.name,
                        "value": value.to_json(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if json {
        let output = serde_json::json!({
            "package": context.package,
            "repositories": repositories,
            "entries": entries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {}", "Settings for".bold(), context.package.cyan());
    println!();

    println!("  {}:", "Repositories".dimmed());
    for repo in settings.repositories() {
        println!(
            "    {} {:<8} {:<12} {}",
            "+".green(),
            repo.scope().to_string(),
            repo.name(),
            location(context, repo).dimmed()
        );
    }
    println!();

    if entries.is_empty() {
        println!("  {:<12} {}", "Entries:".dimmed(), "(none)".dimmed());
    } else {
        println!("  {}:", "Entries".dimmed());
        for entry in &entries {
            println!(
                "    {} {} = {}",
                entry["key"].as_str().unwrap_or_default(),
                format!("({})", entry["type"].as_str().unwrap_or_default()).dimmed(),
                entry["value"]
            );
        }
    }

    Ok(())
}

/// Print where settings for `scope` are stored.
pub fn run_path(context: &SettingsContext, scope: SettingsScope) -> Result<()> {
    match scope {
        SettingsScope::Project => {
            let repo = context.project_file()?;
            if let Some(path) = repo.path() {
                println!("{}", path.to_native().display());
            }
        }
        SettingsScope::User => println!("{}", context.preferences_path().display()),
    }
    Ok(())
}

/// The backing file of `repo`; preference repositories live in the
/// preference file.
fn location(context: &SettingsContext, repo: &Repository) -> String {
    match repo.path() {
        Some(path) => path.to_native().display().to_string(),
        None => context.preferences_path().display().to_string(),
    }
}
