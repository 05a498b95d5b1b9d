// src/cli/handlers/summary.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows an overview of the configuration.")]
struct SummaryArgs {
    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let summary_args = SummaryArgs::try_parse_from(&args)?;
    let summary = store.summary();

    if summary_args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("\n--- {} ---", t!("summary.header").yellow());
    println!(
        "  {:<18} {}",
        t!("summary.label.user_dir").blue(),
        summary.user_config_dir.display()
    );
    println!(
        "  {:<18} {}",
        t!("summary.label.template_dir").blue(),
        summary.template_config_dir.display()
    );
    println!(
        "  {:<18} {} ({})",
        t!("summary.label.settings").blue(),
        summary.settings_count,
        summary.settings_sections.join(", ")
    );
    println!(
        "  {:<18} {}",
        t!("summary.label.commands").blue(),
        summary.commands_count
    );
    println!(
        "  {:<18} {}",
        t!("summary.label.auto_persist").blue(),
        summary.auto_persist
    );
    println!(
        "  {:<18} {}",
        t!("summary.label.cache").blue(),
        summary.cache_size
    );
    Ok(())
}
