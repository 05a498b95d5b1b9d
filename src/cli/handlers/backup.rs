// src/cli/handlers/backup.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Copies the user config files into a backup directory."
)]
struct BackupArgs {
    /// Target directory. Defaults to a timestamped directory next to the config.
    path: Option<String>,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let backup_args = BackupArgs::try_parse_from(&args)?;
    let target = backup_args
        .path
        .as_deref()
        .map(commons::expand_path)
        .transpose()?;

    let backup_dir = store
        .backup(target.as_deref())
        .map_err(|e| commons::report_store_error(e, store))?;

    println!(
        "{}",
        format!(t!("backup.success.created"), path = backup_dir.display()).green()
    );
    Ok(())
}
