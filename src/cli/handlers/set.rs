// src/cli/handlers/set.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Sets a setting by dot path. Values are read as JSON when they parse, as text otherwise."
)]
struct SetArgs {
    path: String,
    value: String,

    /// Keep the change in memory only.
    #[arg(long)]
    no_save: bool,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let set_args = SetArgs::try_parse_from(&args)?;
    let value = commons::parse_setting_value(&set_args.value);

    store
        .set_setting(&set_args.path, value.clone(), set_args.no_save.then_some(false))
        .map_err(|e| commons::report_store_error(e, store))?;

    println!(
        "{}",
        format!(t!("set.success.set"), path = set_args.path, value = value).green()
    );
    Ok(())
}
