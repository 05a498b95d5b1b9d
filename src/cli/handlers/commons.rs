// src/cli/handlers/commons.rs

// Shared helpers for the CLI handlers.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use serde_json::Value;
use std::path::PathBuf;

use crate::{
    core::store::{ConfigStore, StoreError},
    models::{CommandRecord, ConfigScope, ConflictMap},
};

/// Expands `~` and environment variables in a user-supplied path and strips
/// Windows verbatim prefixes.
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .with_context(|| format!(t!("error.path_expansion"), path = raw))?;
    Ok(dunce::simplified(&PathBuf::from(expanded.into_owned())).to_path_buf())
}

/// Parses a `--scope` value.
pub fn parse_scope(raw: &str) -> Result<ConfigScope> {
    raw.parse::<ConfigScope>().map_err(|e| anyhow!(e))
}

/// Interprets a CLI value as JSON when it parses, as a plain string otherwise,
/// so `set Audio.Rate 16000` stores a number and `set Lang en` a string.
pub fn parse_setting_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Asks for confirmation unless `assume_yes` is set.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !confirmed {
        println!("{}", t!("common.info.cancelled"));
    }
    Ok(confirmed)
}

/// Prints a conflict set as a two-column table.
pub fn print_conflicts(conflicts: &ConflictMap) {
    if conflicts.is_empty() {
        return;
    }
    println!("\n{}", t!("common.conflicts.header").yellow().bold());
    for (phrase, owner) in conflicts {
        println!("  {:<30} {} {}", format!("'{}'", phrase).red(), "->".dimmed(), owner);
    }
}

/// Turns a failed store mutation into a CLI error, printing the conflict
/// table first when there is one.
pub fn report_store_error(error: StoreError, store: &ConfigStore) -> anyhow::Error {
    print_conflicts(&store.last_conflicts());
    anyhow!(error)
}

/// Prints one command in the detailed layout used by `show` and `add`.
pub fn print_record(description: &str, record: &CommandRecord) {
    println!("\n--- {} ---", description.yellow().bold());
    println!("  {:<10} {}", t!("common.label.action").blue(), record.action);
    println!("  {:<10} {}", t!("common.label.command").blue(), record.command);
    println!("  {}", t!("common.label.phrases").blue());
    for phrase in &record.phrases {
        println!("    - {}", phrase.cyan());
    }
}
