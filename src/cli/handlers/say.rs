// src/cli/handlers/say.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use crate::core::store::ConfigStore;
use crate::system::executor::{self, SystemExecutor};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Resolves a sentence and runs the matching command."
)]
struct SayArgs {
    /// The sentence, as it would have been spoken.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    text: Vec<String>,

    /// Open URLs with this browser instead of the configured one.
    #[arg(long, value_name = "PATH")]
    browser: Option<String>,
}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let say_args = SayArgs::try_parse_from(&args)?;
    let text = say_args.text.join(" ");

    // No key sender or internal actions exist outside the desktop app.
    let mut system = SystemExecutor::from_store(store);
    if let Some(browser) = say_args.browser {
        system = system.with_browser(browser);
    }
    let commands = store.get_all_commands();

    let resolution = executor::handle_text(&text, &commands, &system)
        .with_context(|| format!(t!("say.error.failed"), text = text))?;

    match &resolution.matched {
        Some(matched) => println!(
            "{}",
            format!(
                t!("say.success.executed"),
                description = matched.description.green().bold(),
                query = resolution.remainder
            )
        ),
        None => println!("{}", format!(t!("say.info.not_recognized"), text = text).yellow()),
    }
    Ok(())
}
