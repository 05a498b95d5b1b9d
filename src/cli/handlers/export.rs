// src/cli/handlers/export.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Exports configuration to a JSON file.")]
struct ExportArgs {
    /// Destination file.
    path: String,

    /// settings, commands or all.
    #[arg(long, default_value = "all")]
    scope: String,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let export_args = ExportArgs::try_parse_from(&args)?;
    let scope = commons::parse_scope(&export_args.scope)?;
    let path = commons::expand_path(&export_args.path)?;

    store
        .export_config(&path, scope)
        .map_err(|e| commons::report_store_error(e, store))?;

    println!(
        "{}",
        format!(t!("export.success.exported"), scope = scope, path = path.display()).green()
    );
    Ok(())
}
