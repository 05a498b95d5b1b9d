// src/cli/handlers/remove.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Deletes a command.")]
struct RemoveArgs {
    /// Description of the command to delete.
    description: String,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let remove_args = RemoveArgs::try_parse_from(&args)?;
    let description = remove_args.description;

    if store.get_command(&description).is_none() {
        return Err(anyhow!(t!("error.command_not_found"), description = description));
    }

    let prompt = format!(t!("remove.prompt.confirm"), description = description);
    if !commons::confirm(&prompt, remove_args.yes)? {
        return Ok(());
    }

    store
        .remove_command(&description, None)
        .map_err(|e| commons::report_store_error(e, store))?;
    println!(
        "{}",
        format!(t!("remove.success.removed"), description = description).green()
    );
    Ok(())
}
