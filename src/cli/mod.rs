// src/cli/mod.rs

use crate::core::paths::{AppPaths, FixedPaths, PathProvider};
use crate::core::store::ConfigStore;
use anyhow::{Context, Result};
use clap::Parser;

pub mod dispatcher;
pub mod handlers;

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    // Mini-renderer for the semantic help template: `<title>` etc. become
    // ANSI styles, or nothing when colors are off.
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let err = if use_colors { "\x1b[91m" } else { "" }; // Bright Red
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<err>", err)
        .replace("</err>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// assistant: voice command resolution and configuration tool.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Use this directory instead of the platform config directory.
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<String>,

    /// Use this directory for the factory-default templates.
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<String>,

    /// The action followed by its own arguments. Handlers parse the rest.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Opens the store, honoring the directory overrides. An override for one
    /// directory keeps the platform default for the other.
    pub fn open_store(&self) -> Result<ConfigStore> {
        if self.config_dir.is_none() && self.template_dir.is_none() {
            return ConfigStore::open(&AppPaths).context(t!("error.store_open_failed"));
        }

        let user_dir = match &self.config_dir {
            Some(raw) => handlers::commons::expand_path(raw)?,
            None => AppPaths.user_config_dir()?,
        };
        let template_dir = match &self.template_dir {
            Some(raw) => handlers::commons::expand_path(raw)?,
            None => AppPaths.template_config_dir()?,
        };
        log::debug!(
            "Using config dir '{}' and template dir '{}'.",
            user_dir.display(),
            template_dir.display()
        );
        ConfigStore::open(&FixedPaths::new(user_dir, template_dir))
            .context(t!("error.store_open_failed"))
    }
}
