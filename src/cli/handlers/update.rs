// src/cli/handlers/update.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;
use crate::models::Action;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Changes an existing command. Omitted fields keep their current value."
)]
struct UpdateArgs {
    /// Description of the command to change.
    description: String,

    /// Replaces the phrase list. Repeat for several.
    #[arg(short, long = "phrase", value_name = "PHRASE")]
    phrases: Vec<String>,

    #[arg(short, long)]
    action: Option<String>,

    #[arg(short, long)]
    command: Option<String>,

    /// Keep the change in memory only.
    #[arg(long)]
    no_save: bool,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let update_args = UpdateArgs::try_parse_from(&args)?;
    let description = update_args.description;

    let mut record = store.get_command(&description).ok_or_else(|| {
        anyhow!(t!("error.command_not_found"), description = description)
    })?;

    if !update_args.phrases.is_empty() {
        record.phrases = update_args.phrases;
    }
    if let Some(raw) = update_args.action {
        record.action = raw.parse::<Action>()?;
    }
    if let Some(command) = update_args.command {
        record.command = command;
    }

    let persist = update_args.no_save.then_some(false);
    store
        .update_command(&description, record.clone(), persist)
        .map_err(|e| commons::report_store_error(e, store))?;

    println!(
        "{}",
        format!(t!("update.success.updated"), description = description).green()
    );
    commons::print_record(&description, &record);
    Ok(())
}
