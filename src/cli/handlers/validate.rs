// src/cli/handlers/validate.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;

use crate::cli::handlers::commons;
use crate::core::store::ConfigStore;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Checks that no phrase is shared by two commands."
)]
struct ValidateArgs {}

pub fn handle(args: Vec<String>, store: &ConfigStore) -> Result<()> {
    let _validate_args = ValidateArgs::try_parse_from(&args)?;

    let conflicts = store.validate();
    if conflicts.is_empty() {
        println!("{}", t!("validate.success.clean").green());
        return Ok(());
    }

    commons::print_conflicts(&conflicts);
    Err(anyhow!(t!("validate.error.conflicts"), count = conflicts.len()))
}
