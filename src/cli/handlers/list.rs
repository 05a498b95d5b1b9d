// src/cli/handlers/list.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists every configured command.")]
struct ListArgs {
    /// Print the command map as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let commands = store.get_all_commands();

    if list_args.json {
        println!("{}", serde_json::to_string_pretty(&commands)?);
        return Ok(());
    }

    if commands.is_empty() {
        println!("{}", t!("list.info.empty").yellow());
        return Ok(());
    }

    println!(
        "\n{}",
        format!(t!("list.header"), count = commands.len()).bold()
    );
    for (description, record) in &commands {
        println!(
            "  {:<30} {:<9} {}",
            description.green(),
            record.action.to_string().blue(),
            record.phrases.join(", ").dimmed()
        );
    }
    Ok(())
}
