// src/cli/handlers/import.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Imports configuration from a JSON file. Nothing changes if any entry is invalid or conflicts."
)]
struct ImportArgs {
    /// Source file.
    path: String,

    /// settings, commands or all.
    #[arg(long, default_value = "all")]
    scope: String,

    /// Overlay onto the current configuration instead of replacing it.
    #[arg(long)]
    merge: bool,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let import_args = ImportArgs::try_parse_from(&args)?;
    let scope = commons::parse_scope(&import_args.scope)?;
    let path = commons::expand_path(&import_args.path)?;

    store
        .import_config(&path, scope, import_args.merge)
        .map_err(|e| commons::report_store_error(e, store))?;

    let message = if import_args.merge {
        t!("import.success.merged")
    } else {
        t!("import.success.replaced")
    };
    println!(
        "{}",
        format!("{} ({}, {})", message, scope, path.display()).green()
    );
    Ok(())
}
