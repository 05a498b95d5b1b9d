// src/cli/handlers/add.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;
use crate::models::{Action, CommandRecord};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Adds a new voice command.")]
struct AddArgs {
    /// Unique description of the command.
    description: String,

    /// A trigger phrase. Repeat for several.
    #[arg(short, long = "phrase", required = true, value_name = "PHRASE")]
    phrases: Vec<String>,

    /// One of: browser, command, keys, internal.
    #[arg(short, long)]
    action: String,

    /// URL template, shell command, key chord or internal action name.
    #[arg(short, long)]
    command: String,

    /// Keep the change in memory only.
    #[arg(long)]
    no_save: bool,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let add_args = AddArgs::try_parse_from(&args)?;
    let action: Action = add_args.action.parse()?;
    let record = CommandRecord::new(add_args.phrases, action, add_args.command);

    let persist = add_args.no_save.then_some(false);
    store
        .add_command(&add_args.description, record.clone(), persist)
        .map_err(|e| commons::report_store_error(e, store))?;

    println!(
        "{}",
        format!(t!("add.success.added"), description = add_args.description).green()
    );
    commons::print_record(&add_args.description, &record);
    Ok(())
}
