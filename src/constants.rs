// src/constants.rs

//! File, directory and section names shared by the store and the CLI.

/// Name of the application directory created under the platform config dir.
pub const APP_DIR_NAME: &str = "Assistant";

/// Name of the directory holding the read-only template configuration.
pub const TEMPLATE_DIR_NAME: &str = "config";

/// Settings document, in both the template and the user directory.
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Commands document, in both the template and the user directory.
pub const COMMANDS_FILENAME: &str = "commands.json";

/// Every file managed by the store, in load order.
pub const CONFIG_FILENAMES: [&str; 2] = [SETTINGS_FILENAME, COMMANDS_FILENAME];

/// Top-level key holding settings in an `all`-scope export.
pub const SETTINGS_SECTION: &str = "settings";

/// Top-level key holding commands in an `all`-scope export.
pub const COMMANDS_SECTION: &str = "commands";

/// Prefix of backup directories created next to the user config directory.
pub const BACKUP_PREFIX: &str = "Assistant_backup_";

/// Environment variable overriding the template directory.
pub const TEMPLATE_DIR_ENV: &str = "ASSISTANT_TEMPLATE_DIR";

/// Maximum length of a command shown in phrase listings.
pub const DISPLAY_COMMAND_MAX_LEN: usize = 80;
