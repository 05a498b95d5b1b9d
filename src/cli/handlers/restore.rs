// src/cli/handlers/restore.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Overwrites the user config files with those of a backup directory."
)]
struct RestoreArgs {
    /// A directory created by `backup`.
    path: String,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let restore_args = RestoreArgs::try_parse_from(&args)?;
    let backup_dir = commons::expand_path(&restore_args.path)?;

    let prompt = format!(t!("restore.prompt.confirm"), path = backup_dir.display());
    if !commons::confirm(&prompt, restore_args.yes)? {
        return Ok(());
    }

    let report = store
        .restore(&backup_dir)
        .map_err(|e| commons::report_store_error(e, store))?;

    println!(
        "{}",
        format!(
            t!("restore.success.restored"),
            path = backup_dir.display(),
            commands = report.commands_loaded
        )
        .green()
    );
    Ok(())
}
