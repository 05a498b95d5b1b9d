// src/system/executor.rs

use crate::core::resolver::{self, Resolution};
use crate::core::store::ConfigStore;
use crate::core::template::{format_command, parse_key_chord};
use crate::models::{Action, CommandMap, CommandRecord};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::process::{Child, Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("No key sender is available to press '{0}'.")]
    KeysUnsupported(String),
    #[error("Key chord '{chord}' could not be sent: {reason}")]
    KeysFailed { chord: String, reason: String },
    #[error("Unknown internal action '{0}'.")]
    UnknownInternal(String),
}

/// Performs the effect a resolved command asks for.
pub trait ActionExecutor {
    /// Runs `record` with `query` (the resolver's remainder) filled into its
    /// placeholders.
    fn execute(
        &self,
        description: &str,
        record: &CommandRecord,
        query: &str,
    ) -> Result<(), ExecutionError>;
}

/// Presses a chord of normalized key names (`["ctrl", "shift", "t"]`).
pub type KeySender = Box<dyn Fn(&[String]) -> Result<(), String> + Send + Sync>;

/// An action implemented by the host application, called with the query.
pub type InternalHandler = Box<dyn Fn(&str) + Send + Sync>;

/// Executes actions against the real system: browsers and shell commands are
/// spawned as detached processes, keys and internal actions go to injected
/// callbacks.
#[derive(Default)]
pub struct SystemExecutor {
    browser: Option<String>,
    key_sender: Option<KeySender>,
    internal: HashMap<String, InternalHandler>,
}

impl fmt::Debug for SystemExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut internal: Vec<&String> = self.internal.keys().collect();
        internal.sort();
        f.debug_struct("SystemExecutor")
            .field("browser", &self.browser)
            .field("key_sender", &self.key_sender.is_some())
            .field("internal", &internal)
            .finish()
    }
}

impl SystemExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an executor using the browser configured in the store, if any.
    /// `Default_Browser` wins over `Application.Browser_Path`.
    pub fn from_store(store: &ConfigStore) -> Self {
        let configured = ["Default_Browser", "Application.Browser_Path"]
            .into_iter()
            .find_map(|path| match store.get_setting(path, Value::Null) {
                Value::String(browser) if !browser.trim().is_empty() => Some(browser),
                _ => None,
            });
        Self {
            browser: configured,
            ..Self::default()
        }
    }

    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = Some(browser.into());
        self
    }

    pub fn with_key_sender(mut self, sender: KeySender) -> Self {
        self.key_sender = Some(sender);
        self
    }

    /// Registers an internal action. Names are matched trimmed and
    /// lower-cased.
    pub fn register_internal(mut self, name: &str, handler: InternalHandler) -> Self {
        self.internal.insert(name.trim().to_lowercase(), handler);
        self
    }

    fn open_url(&self, url: &str) -> Result<(), ExecutionError> {
        let mut command = match &self.browser {
            Some(browser) => {
                let mut command = StdCommand::new(browser);
                command.arg(url);
                command
            }
            None => platform_opener(url),
        };
        log::info!("Opening URL: {}", url);
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ExecutionError::CommandFailed(url.to_string(), e))?;
        detach(child);
        Ok(())
    }

    fn run_shell(&self, command_line: &str) -> Result<(), ExecutionError> {
        let mut command = if cfg!(target_os = "windows") {
            let mut command = StdCommand::new("cmd");
            command.arg("/C").arg(command_line);
            command
        } else {
            let mut command = StdCommand::new("sh");
            command.arg("-c").arg(command_line);
            command
        };
        log::info!("Running command: {}", command_line);
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ExecutionError::CommandFailed(command_line.to_string(), e))?;
        detach(child);
        Ok(())
    }

    fn press_keys(&self, chord: &str) -> Result<(), ExecutionError> {
        let keys = parse_key_chord(chord);
        if keys.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }
        let sender = self
            .key_sender
            .as_ref()
            .ok_or_else(|| ExecutionError::KeysUnsupported(chord.to_string()))?;
        log::info!("Sending keys: {}", keys.join("+"));
        sender(keys.as_slice()).map_err(|reason| ExecutionError::KeysFailed {
            chord: chord.to_string(),
            reason,
        })
    }

    fn run_internal(&self, name: &str, query: &str) -> Result<(), ExecutionError> {
        let key = name.trim().to_lowercase();
        let handler = self
            .internal
            .get(&key)
            .ok_or_else(|| ExecutionError::UnknownInternal(name.trim().to_string()))?;
        log::info!("Running internal action: {}", key);
        handler(query);
        Ok(())
    }
}

impl ActionExecutor for SystemExecutor {
    fn execute(
        &self,
        description: &str,
        record: &CommandRecord,
        query: &str,
    ) -> Result<(), ExecutionError> {
        let template = record.command.trim();
        if template.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }
        log::debug!("Executing '{}' ({}) with query '{}'.", description, record.action, query);

        match record.action {
            Action::Browser => self.open_url(&format_command(template, query)),
            Action::Command => self.run_shell(&format_command(template, query)),
            Action::Keys => self.press_keys(template),
            Action::Internal => self.run_internal(template, query),
        }
    }
}

fn platform_opener(target: &str) -> StdCommand {
    let mut command = if cfg!(target_os = "windows") {
        let mut command = StdCommand::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else if cfg!(target_os = "macos") {
        StdCommand::new("open")
    } else {
        StdCommand::new("xdg-open")
    };
    command.arg(target);
    command
}

/// Lets a spawned process run on its own; a background thread reaps it.
fn detach(mut child: Child) {
    let pid = child.id();
    std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            log::warn!("Failed to wait for child process {}: {}", pid, e);
        }
    });
}

/// Resolves `text` against `commands` and executes the winner with the
/// remainder as its query. Unrecognized input is logged and is not an error.
pub fn handle_text(
    text: &str,
    commands: &CommandMap,
    executor: &dyn ActionExecutor,
) -> Result<Resolution, ExecutionError> {
    let resolution = resolver::resolve(text, commands);
    let Some(matched) = &resolution.matched else {
        log::info!("Command not recognized: '{}'", text.trim());
        return Ok(resolution);
    };
    if let Some(record) = commands.get(&matched.description) {
        executor.execute(&matched.description, record, &resolution.remainder)?;
    }
    Ok(resolution)
}
