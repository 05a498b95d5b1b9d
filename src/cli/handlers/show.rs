// src/cli/handlers/show.rs

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows one command in detail.")]
struct ShowArgs {
    /// The command's description.
    description: String,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    let record = store.get_command(&show_args.description).ok_or_else(|| {
        anyhow!(
            t!("error.command_not_found"),
            description = show_args.description
        )
    })?;
    commons::print_record(&show_args.description, &record);
    Ok(())
}
