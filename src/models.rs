// src/models.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

// --- COMMAND MODELS (what lives in commands.json) ---

/// The closed set of effects a command can request.
///
/// Interpretation of [`CommandRecord::command`] depends on the variant:
/// a URL template, a shell command template, `+`-joined key names, or the
/// symbolic name of an internal action.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Open a URL in a browser.
    Browser,
    /// Spawn a shell command.
    Command,
    /// Send a key chord.
    Keys,
    /// Trigger an action inside the application itself.
    Internal,
}

impl Action {
    /// All variants, in declaration order.
    pub const ALL: [Self; 4] = [Self::Browser, Self::Command, Self::Keys, Self::Internal];

    /// The wire name used in `commands.json`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Command => "command",
            Self::Keys => "keys",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidAction(s.to_string()))
    }
}

/// One command: the phrases that trigger it and what it does.
/// The command's description is the key it is stored under, not a field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    #[serde(rename = "Phrases")]
    pub phrases: Vec<String>,
    #[serde(rename = "Action")]
    pub action: Action,
    #[serde(rename = "Command")]
    pub command: String,
}

/// Structural problems found in a command record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("command data must be a JSON object")]
    NotAnObject,
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("at least one phrase is required")]
    NoPhrases,
    #[error("phrase #{index} is empty")]
    EmptyPhrase { index: usize },
    #[error("invalid action '{0}' (expected one of: browser, command, keys, internal)")]
    InvalidAction(String),
    #[error("command must not be empty")]
    EmptyCommand,
}

impl CommandRecord {
    /// Builds a record from its parts without validating it.
    pub fn new(phrases: Vec<String>, action: Action, command: impl Into<String>) -> Self {
        Self {
            phrases,
            action,
            command: command.into(),
        }
    }

    /// Checks the invariants the type system cannot: a non-empty phrase list,
    /// no blank phrase, and a non-blank command.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.phrases.is_empty() {
            return Err(ValidationError::NoPhrases);
        }
        if let Some(index) = self.phrases.iter().position(|p| p.trim().is_empty()) {
            return Err(ValidationError::EmptyPhrase { index });
        }
        if self.command.trim().is_empty() {
            return Err(ValidationError::EmptyCommand);
        }
        Ok(())
    }

    /// Parses and validates an untyped JSON command entry, reporting exactly
    /// which field is missing or malformed.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

        let field = |name: &'static str| {
            object
                .get(name)
                .ok_or(ValidationError::MissingField(name))
        };

        let phrases = field("Phrases")?
            .as_array()
            .ok_or(ValidationError::WrongType {
                field: "Phrases",
                expected: "an array of strings",
            })?
            .iter()
            .map(|p| {
                p.as_str().map(str::to_string).ok_or(ValidationError::WrongType {
                    field: "Phrases",
                    expected: "an array of strings",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let action = field("Action")?
            .as_str()
            .ok_or(ValidationError::WrongType {
                field: "Action",
                expected: "a string",
            })?
            .parse::<Action>()?;

        let command = field("Command")?
            .as_str()
            .ok_or(ValidationError::WrongType {
                field: "Command",
                expected: "a string",
            })?
            .to_string();

        let record = Self {
            phrases,
            action,
            command,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Commands keyed by description. Ordered, so every sweep over the map
/// (conflict checks, resolution ties, serialization) is deterministic.
pub type CommandMap = BTreeMap<String, CommandRecord>;

/// Conflicting phrase (as the candidate spelled it) -> description of the
/// command that already owns it.
pub type ConflictMap = BTreeMap<String, String>;

/// Renders a conflict map as `'phrase' -> Owner, 'other' -> Owner2`.
pub fn format_conflicts(conflicts: &ConflictMap) -> String {
    conflicts
        .iter()
        .map(|(phrase, owner)| format!("'{}' -> {}", phrase, owner))
        .collect::<Vec<_>>()
        .join(", ")
}

// --- SCOPES & REPORTS ---

/// Which part of the configuration a bulk operation targets.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigScope {
    Settings,
    Commands,
    #[default]
    All,
}

impl FromStr for ConfigScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "settings" => Ok(Self::Settings),
            "commands" => Ok(Self::Commands),
            "all" => Ok(Self::All),
            other => Err(format!(
                "invalid config scope '{}' (expected settings, commands or all)",
                other
            )),
        }
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Settings => "settings",
            Self::Commands => "commands",
            Self::All => "all",
        })
    }
}

/// One trigger phrase, flattened for display.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PhraseInfo {
    /// The phrase, trimmed.
    pub phrase: String,
    /// Description of the owning command.
    pub description: String,
    pub action: Action,
    /// The command, truncated for display.
    pub command: String,
}

/// A point-in-time overview of the store.
#[derive(Serialize, Debug, Clone)]
pub struct ConfigSummary {
    /// Top-level settings keys, sorted.
    pub settings_sections: Vec<String>,
    pub settings_count: usize,
    pub commands_count: usize,
    /// Every command description, sorted.
    pub command_descriptions: Vec<String>,
    /// Number of memoized setting lookups.
    pub cache_size: usize,
    pub auto_persist: bool,
    /// Memory holds changes not yet on disk.
    pub dirty: bool,
    pub user_config_dir: PathBuf,
    pub template_config_dir: PathBuf,
}
