//! get, set and delete commands

use std::str::FromStr;

use colored::Colorize;
use settings_core::{Json, SettingType, SettingValue, Settings, SettingsScope};

use super::save_all;
use crate::cli::ValueKind;
use crate::context::SettingsContext;
use crate::error::{CliError, Result};

/// Print the value stored under `key`, or `default` if there is none.
pub fn run_get(
    context: &SettingsContext,
    key: &str,
    kind: ValueKind,
    scope: SettingsScope,
    default: Option<&str>,
) -> Result<()> {
    let mut settings = context.open()?;

    match lookup(&mut settings, key, kind, scope)? {
        Some(value) => println!("{}", value),
        None => match default {
            Some(default) => println!("{}", default),
            None => {
                return Err(CliError::user(format!(
                    "No {kind} value for '{key}' in {scope} settings"
                )));
            }
        },
    }
    Ok(())
}

/// Parse `raw` as `kind`, store it under `key` and save.
pub fn run_set(
    context: &SettingsContext,
    key: &str,
    raw: &str,
    kind: ValueKind,
    scope: SettingsScope,
) -> Result<()> {
    let mut settings = context.open()?;

    match kind {
        ValueKind::Bool => settings.set(key, parse::<bool>(raw, kind)?, scope)?,
        ValueKind::Int => settings.set(key, parse::<i64>(raw, kind)?, scope)?,
        ValueKind::Uint => settings.set(key, parse::<u64>(raw, kind)?, scope)?,
        ValueKind::Float => settings.set(key, parse::<f64>(raw, kind)?, scope)?,
        ValueKind::String => settings.set(key, raw.to_string(), scope)?,
        ValueKind::Json => {
            let value: serde_json::Value = serde_json::from_str(raw)?;
            settings.set(key, Json(value), scope)?
        }
    }
    save_all(&mut settings)?;

    println!(
        "{} Set {} ({}) in {} settings",
        "OK".green().bold(),
        key.cyan(),
        kind,
        scope
    );
    Ok(())
}

/// Delete `key` and save. Deleting an absent key is not an error.
pub fn run_delete(
    context: &SettingsContext,
    key: &str,
    kind: ValueKind,
    scope: SettingsScope,
) -> Result<()> {
    let mut settings = context.open()?;

    let removed = match kind {
        ValueKind::Bool => settings.delete_key::<bool>(key, scope),
        ValueKind::Int => settings.delete_key::<i64>(key, scope),
        ValueKind::Uint => settings.delete_key::<u64>(key, scope),
        ValueKind::Float => settings.delete_key::<f64>(key, scope),
        ValueKind::String => settings.delete_key::<String>(key, scope),
        ValueKind::Json => settings.delete_key::<Json<serde_json::Value>>(key, scope),
    };

    if removed {
        save_all(&mut settings)?;
        println!(
            "{} Deleted {} from {} settings",
            "OK".green().bold(),
            key.cyan(),
            scope
        );
    } else {
        println!("{} No {} value for '{}'", "-".dimmed(), kind, key);
    }
    Ok(())
}

fn lookup(
    settings: &mut Settings,
    key: &str,
    kind: ValueKind,
    scope: SettingsScope,
) -> Result<Option<SettingValue>> {
    match kind {
        ValueKind::Bool => typed::<bool>(settings, key, scope),
        ValueKind::Int => typed::<i64>(settings, key, scope),
        ValueKind::Uint => typed::<u64>(settings, key, scope),
        ValueKind::Float => typed::<f64>(settings, key, scope),
        ValueKind::String => typed::<String>(settings, key, scope),
        ValueKind::Json => typed::<Json<serde_json::Value>>(settings, key, scope),
    }
}

fn typed<T: SettingType>(
    settings: &mut Settings,
    key: &str,
    scope: SettingsScope,
) -> Result<Option<SettingValue>> {
    Ok(settings
        .try_get::<T>(key, scope)
        .map(T::into_value)
        .transpose()?)
}

fn parse<T: FromStr>(raw: &str, kind: ValueKind) -> Result<T> {
    raw.parse()
        .map_err(|_| CliError::user(format!("'{raw}' is not a valid {kind} value")))
}
