// src/cli/dispatcher.rs

use anyhow::{Result, anyhow};

use crate::{cli::handlers, core::store::ConfigStore};

// --- Command Definition and Registry ---

/// A CLI action, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &ConfigStore) -> Result<()>,
}

/// The single source of truth for all CLI actions.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "resolve",
        aliases: &["match"],
        handler: handlers::resolve::handle,
    },
    CommandDefinition {
        name: "say",
        aliases: &[],
        handler: handlers::say::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "phrases",
        aliases: &[],
        handler: handlers::phrases::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &[],
        handler: handlers::show::handle,
    },
    CommandDefinition {
        name: "add",
        aliases: &["new"],
        handler: handlers::add::handle,
    },
    CommandDefinition {
        name: "update",
        aliases: &["edit"],
        handler: handlers::update::handle,
    },
    CommandDefinition {
        name: "remove",
        aliases: &["rm", "del"],
        handler: handlers::remove::handle,
    },
    CommandDefinition {
        name: "get",
        aliases: &[],
        handler: handlers::get::handle,
    },
    CommandDefinition {
        name: "set",
        aliases: &[],
        handler: handlers::set::handle,
    },
    CommandDefinition {
        name: "export",
        aliases: &[],
        handler: handlers::export::handle,
    },
    CommandDefinition {
        name: "import",
        aliases: &[],
        handler: handlers::import::handle,
    },
    CommandDefinition {
        name: "backup",
        aliases: &[],
        handler: handlers::backup::handle,
    },
    CommandDefinition {
        name: "restore",
        aliases: &[],
        handler: handlers::restore::handle,
    },
    CommandDefinition {
        name: "reset",
        aliases: &[],
        handler: handlers::reset::handle,
    },
    CommandDefinition {
        name: "validate",
        aliases: &["check"],
        handler: handlers::validate::handle,
    },
    CommandDefinition {
        name: "summary",
        aliases: &["info"],
        handler: handlers::summary::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `assistant <action> [args...]` to the action's handler.
pub fn dispatch(all_args: Vec<String>, store: &ConfigStore) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(action) = args.next() else {
        println!("{}", t!("cli.no_action"));
        return Ok(());
    };

    let command = find_command(&action)
        .ok_or_else(|| anyhow!(t!("error.unknown_action"), action = action))?;
    (command.handler)(args.collect(), store)
}
