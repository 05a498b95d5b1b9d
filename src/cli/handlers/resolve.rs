// src/cli/handlers/resolve.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::core::{resolver, store::ConfigStore, template::format_command};
use crate::models::Action;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows which command a sentence would trigger, without running it."
)]
struct ResolveArgs {
    /// The sentence to resolve.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    text: Vec<String>,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let resolve_args = ResolveArgs::try_parse_from(&args)?;
    let text = resolve_args.text.join(" ");

    let commands = store.get_all_commands();
    let resolution = resolver::resolve(&text, &commands);

    let Some(matched) = &resolution.matched else {
        println!("{}", t!("resolve.info.no_match").yellow());
        println!("  {:<12} '{}'", t!("resolve.label.remainder").blue(), resolution.remainder);
        return Ok(());
    };

    println!("\n--- {} ---", matched.description.green().bold());
    println!("  {:<12} '{}'", t!("resolve.label.phrase").blue(), matched.phrase);
    println!("  {:<12} '{}'", t!("resolve.label.remainder").blue(), resolution.remainder);

    if let Some(record) = commands.get(&matched.description) {
        let effect = match record.action {
            Action::Browser | Action::Command => {
                format_command(&record.command, &resolution.remainder)
            }
            Action::Keys | Action::Internal => record.command.clone(),
        };
        println!("  {:<12} {}", t!("common.label.action").blue(), record.action);
        println!("  {:<12} {}", t!("resolve.label.would_run").blue(), effect.cyan());
    }
    Ok(())
}
