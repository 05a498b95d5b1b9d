// src/cli/handlers/get.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use serde_json::Value;

use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints a setting by dot path (e.g. Floating_Icon.Position.Offset_X)."
)]
struct GetArgs {
    path: String,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let get_args = GetArgs::try_parse_from(&args)?;
    match store.get_setting(&get_args.path, Value::Null) {
        Value::Null => println!(
            "{}",
            format!(t!("get.info.not_set"), path = get_args.path).yellow()
        ),
        value => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}
