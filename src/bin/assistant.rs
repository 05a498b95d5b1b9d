// src/bin/assistant.rs

use anyhow::Result;
use assistant::cli::{Cli, dispatcher};
use assistant::t;
use clap::Parser;
use colored::*;

/// Entry point: sets up logging, opens the store, dispatches to the action's
/// handler and prints any error in one place.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // Handler-level `--help` and usage errors print the way clap prints them.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let store = cli.open_store()?;
    dispatcher::dispatch(cli.args, &store)?;

    // Actions that ran with --no-save leave the store dirty on purpose.
    if store.is_dirty() {
        log::info!("{}", t!("cli.unsaved_changes"));
    }
    Ok(())
}
