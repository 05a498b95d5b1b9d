// src/cli/handlers/reset.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Discards the user configuration and starts over from the templates."
)]
struct ResetArgs {
    /// Back up the current files first.
    #[arg(long)]
    backup: bool,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let reset_args = ResetArgs::try_parse_from(&args)?;

    if !commons::confirm(t!("reset.prompt.confirm"), reset_args.yes)? {
        return Ok(());
    }

    if reset_args.backup {
        let backup_dir = store
            .backup(None)
            .map_err(|e| commons::report_store_error(e, store))?;
        println!(
            "{}",
            format!(t!("backup.success.created"), path = backup_dir.display()).dimmed()
        );
    }

    let report = store
        .reset_to_defaults()
        .map_err(|e| commons::report_store_error(e, store))?;
    println!(
        "{}",
        format!(t!("reset.success.reset"), commands = report.commands_loaded).green()
    );
    Ok(())
}
