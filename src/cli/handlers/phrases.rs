// src/cli/handlers/phrases.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Lists every trigger phrase, sorted, with the command it runs."
)]
struct PhrasesArgs {
    /// Only show the phrases of this command.
    #[arg(long, value_name = "DESCRIPTION")]
    command: Option<String>,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let phrases_args = PhrasesArgs::try_parse_from(&args)?;

    if let Some(description) = phrases_args.command {
        let phrases = store.command_phrases(&description);
        if phrases.is_empty() {
            println!("{}", format!(t!("phrases.info.none_for"), description = description).yellow());
        }
        for phrase in phrases {
            println!("  {}", phrase.cyan());
        }
        return Ok(());
    }

    let all = store.all_phrases();
    if all.is_empty() {
        println!("{}", t!("list.info.empty").yellow());
        return Ok(());
    }
    for info in all {
        println!(
            "  {:<30} {:<25} {:<9} {}",
            info.phrase.cyan(),
            info.description.green(),
            info.action.to_string().blue(),
            info.command.dimmed()
        );
    }
    Ok(())
}
