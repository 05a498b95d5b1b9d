// src/core/store.rs

//! # Config Store
//!
//! The single authority over settings and commands. One instance is built at
//! process start and shared by reference (`Arc<ConfigStore>`) between the UI
//! thread and background workers.
//!
//! ## Locking
//!
//! All state sits behind one mutex. Mutations hold it for their whole
//! duration, disk write included, so persistence is serialized and no reader
//! ever sees a half-applied change. Reads hold it only long enough to clone
//! what they return; callers get independent copies and never a reference
//! into the store.
//!
//! Internally every public method takes the lock exactly once and hands the
//! guarded [`StoreState`] down to `*_locked` helpers, which is why a plain
//! (non-reentrant) mutex is enough.
//!
//! ## Errors
//!
//! Expected failures (validation, conflict, not-found, I/O) come back as
//! [`StoreError`] and are also remembered as the *last error*, which a UI can
//! fetch with [`ConfigStore::last_error_message`]. Every mutating operation
//! overwrites or clears it; reads leave it alone.
//!
//! ## Entries the store cannot parse
//!
//! Invalid entries in `commands.json` are left out of the command map, but
//! their raw JSON is kept and written back on every save, so a hand-edited
//! command the store does not understand is never erased from disk. A load
//! that skipped entries leaves them named in the last error.

use crate::constants::{
    BACKUP_PREFIX, COMMANDS_FILENAME, COMMANDS_SECTION, CONFIG_FILENAMES,
    DISPLAY_COMMAND_MAX_LEN, SETTINGS_FILENAME, SETTINGS_SECTION,
};
use crate::core::conflict;
use crate::core::json_io::{self, JsonError};
use crate::core::paths::{self, PathError, PathProvider};
use crate::core::settings::{self, SettingPathError};
use crate::models::{
    CommandMap, CommandRecord, ConfigScope, ConfigSummary, ConflictMap, PhraseInfo,
    ValidationError, format_conflicts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors reported by [`ConfigStore`] operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A command record failed structural checks.
    #[error("Invalid command data for '{description}': {source}")]
    Validation {
        /// The command that was rejected.
        description: String,
        #[source]
        source: ValidationError,
    },
    /// Candidate phrases collide with phrases owned by other commands.
    #[error(
        "Duplicate phrase(s) detected: {}. Remove the old command(s) or update the phrases to resolve the conflict.",
        format_conflicts(.conflicts)
    )]
    Conflict {
        /// Phrase (as given) to the command that already owns it.
        conflicts: ConflictMap,
    },
    /// Update or remove targeted a description that is not in the map.
    #[error("Command '{0}' does not exist.")]
    NotFound(String),
    /// Add targeted a description that is already in the map.
    #[error("Command '{0}' already exists. Update it instead of adding it again.")]
    AlreadyExists(String),
    /// A setting write could not be applied.
    #[error("Cannot set '{path}': {source}")]
    SettingPath {
        /// The dot path that was being written.
        path: String,
        #[source]
        source: SettingPathError,
    },
    /// Reading or writing a JSON document failed.
    #[error(transparent)]
    Json(#[from] JsonError),
    /// A file copy or removal failed.
    #[error("Filesystem error at '{path}': {source}")]
    Io {
        /// The file the operation was acting on.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config directories could not be resolved or created.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// Restore was pointed at a directory that does not exist.
    #[error("Backup path '{0}' does not exist.")]
    BackupNotFound(PathBuf),
    /// The import file holds no usable section.
    #[error("Nothing to import from '{0}'.")]
    EmptyImport(PathBuf),
    /// `commands.json` has entries that failed validation. They are kept on
    /// disk as they are.
    #[error(
        "Skipped invalid command(s) in commands.json: {}. They are kept on disk until fixed or replaced.",
        .0.join(", ")
    )]
    SkippedEntries(Vec<String>),
}

type StoreResult<T> = Result<T, StoreError>;

/// Construction-time knobs.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Persist after every mutation unless the caller says otherwise.
    pub auto_persist: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { auto_persist: true }
    }
}

/// What a load found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Top-level keys of `settings.json`.
    pub settings_sections: usize,
    /// Commands that parsed and validated.
    pub commands_loaded: usize,
    /// Entries of `commands.json` dropped because they failed validation.
    pub commands_skipped: usize,
}

#[derive(Debug, Clone, Default)]
struct LastError {
    message: String,
    conflicts: ConflictMap,
}

impl From<&StoreError> for LastError {
    fn from(error: &StoreError) -> Self {
        let conflicts = match error {
            StoreError::Conflict { conflicts } => conflicts.clone(),
            _ => ConflictMap::new(),
        };
        Self {
            message: error.to_string(),
            conflicts,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    settings: Map<String, Value>,
    commands: CommandMap,
    /// Raw `commands.json` entries left out of `commands`, written back as
    /// they are on save.
    unparsed: Map<String, Value>,
    /// Memoized `get_setting` lookups, by dot path.
    cache: HashMap<String, Value>,
    auto_persist: bool,
    settings_dirty: bool,
    commands_dirty: bool,
    last_error: Option<LastError>,
}

impl StoreState {
    fn should_persist(&self, persist: Option<bool>) -> bool {
        persist.unwrap_or(self.auto_persist)
    }

    /// Records the outcome of a mutating operation as the last error.
    fn finish<T>(&mut self, result: StoreResult<T>) -> StoreResult<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => self.last_error = Some(LastError::from(e)),
        }
        result
    }

    /// Like [`StoreState::finish`] for operations that reload from disk: a
    /// successful reload that skipped entries still reports them.
    fn finish_reload(&mut self, result: StoreResult<LoadReport>) -> StoreResult<LoadReport> {
        let result = self.finish(result);
        if result.is_ok() {
            self.note_skipped_entries();
        }
        result
    }

    fn note_skipped_entries(&mut self) {
        let skipped: Vec<String> = self
            .unparsed
            .keys()
            .filter(|key| key.as_str() != SETTINGS_SECTION)
            .cloned()
            .collect();
        if !skipped.is_empty() {
            self.last_error = Some(LastError::from(&StoreError::SkippedEntries(skipped)));
        }
    }

    /// A valid command now owns `description`, so its raw leftover is stale.
    fn insert_command(&mut self, description: &str, record: CommandRecord) {
        self.unparsed.remove(description);
        self.commands.insert(description.to_string(), record);
        self.commands_dirty = true;
    }
}

/// Thread-safe, file-backed settings and commands.
#[derive(Debug)]
pub struct ConfigStore {
    user_dir: PathBuf,
    template_dir: PathBuf,
    state: Mutex<StoreState>,
}

impl ConfigStore {
    /// Opens the store with default options. See [`ConfigStore::open_with`].
    pub fn open(provider: &dyn PathProvider) -> StoreResult<Self> {
        Self::open_with(provider, StoreOptions::default())
    }

    /// Resolves the config directories, seeds missing user files from the
    /// templates, and loads both documents.
    ///
    /// # Errors
    /// Only directory resolution or creation can fail. Missing or corrupt
    /// files load as empty structures.
    pub fn open_with(provider: &dyn PathProvider, options: StoreOptions) -> StoreResult<Self> {
        let user_dir = provider.user_config_dir()?;
        let template_dir = provider.template_config_dir()?;
        paths::ensure_user_config_files(&user_dir, &template_dir)?;

        let store = Self {
            user_dir,
            template_dir,
            state: Mutex::new(StoreState {
                auto_persist: options.auto_persist,
                ..StoreState::default()
            }),
        };
        store.load();
        log::info!(
            "ConfigStore initialized (user dir: '{}', templates: '{}').",
            store.user_dir.display(),
            store.template_dir.display()
        );
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // A panic in another thread cannot leave the state half-written: every
        // mutation is a single insert/remove/replace.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn user_path(&self, filename: &str) -> PathBuf {
        self.user_dir.join(filename)
    }

    /// The writable directory this store loads from and saves to.
    pub fn user_config_dir(&self) -> &Path {
        &self.user_dir
    }

    /// The read-only template directory.
    pub fn template_config_dir(&self) -> &Path {
        &self.template_dir
    }

    // --- Loading ---

    /// Replaces the in-memory state with the user files on disk and clears
    /// the lookup cache. Never fails: unreadable documents load as empty.
    /// Skipped entries are named in the last error.
    pub fn load(&self) -> LoadReport {
        let mut state = self.lock();
        let report = self.load_locked(&mut state);
        state.last_error = None;
        state.note_skipped_entries();
        report
    }

    /// Reloads both documents from disk.
    pub fn reload_all(&self) -> LoadReport {
        let report = self.load();
        log::info!(
            "All configurations reloaded ({} settings sections, {} commands).",
            report.settings_sections,
            report.commands_loaded
        );
        report
    }

    fn load_locked(&self, state: &mut StoreState) -> LoadReport {
        let settings = json_io::load_object_or_empty(&self.user_path(SETTINGS_FILENAME));
        let raw_commands = json_io::load_object_or_empty(&self.user_path(COMMANDS_FILENAME));
        let (commands, unparsed) = parse_commands_lenient(raw_commands);

        let report = LoadReport {
            settings_sections: settings.len(),
            commands_loaded: commands.len(),
            commands_skipped: unparsed.keys().filter(|key| key.as_str() != SETTINGS_SECTION).count(),
        };

        state.settings = settings;
        state.commands = commands;
        state.unparsed = unparsed;
        state.cache.clear();
        state.settings_dirty = false;
        state.commands_dirty = false;

        log::info!(
            "Configurations loaded from '{}': {} commands ({} skipped).",
            self.user_dir.display(),
            report.commands_loaded,
            report.commands_skipped
        );
        report
    }

    // --- Settings ---

    /// Reads the value at a dot path, or `default` when any segment is
    /// missing or is not a section.
    pub fn get_setting(&self, path: &str, default: Value) -> Value {
        self.lookup_setting(path).unwrap_or(default)
    }

    /// Typed read: the value at `path` deserialized as `T`, or `default` when
    /// it is absent or has another shape.
    pub fn get_setting_as<T: DeserializeOwned>(&self, path: &str, default: T) -> T {
        self.lookup_setting(path)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or(default)
    }

    fn lookup_setting(&self, path: &str) -> Option<Value> {
        let mut state = self.lock();
        if let Some(cached) = state.cache.get(path) {
            return Some(cached.clone());
        }
        let value = settings::get_path(&state.settings, path)?.clone();
        state.cache.insert(path.to_string(), value.clone());
        Some(value)
    }

    /// Copy of one top-level settings section; empty if absent or not a
    /// section.
    pub fn settings_section(&self, section: &str) -> Map<String, Value> {
        let state = self.lock();
        state
            .settings
            .get(section)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// Writes `value` at a dot path, creating sections on the way.
    ///
    /// `persist` overrides the store's auto-persist flag for this call.
    pub fn set_setting(&self, path: &str, value: Value, persist: Option<bool>) -> StoreResult<()> {
        let mut state = self.lock();
        let result = self.set_setting_locked(&mut state, path, value, persist);
        state.finish(result)
    }

    fn set_setting_locked(
        &self,
        state: &mut StoreState,
        path: &str,
        value: Value,
        persist: Option<bool>,
    ) -> StoreResult<()> {
        let old_value = settings::set_path(&mut state.settings, path, value.clone()).map_err(
            |source| StoreError::SettingPath {
                path: path.to_string(),
                source,
            },
        )?;
        // A write can shadow cached lookups of parents and children alike.
        state.cache.clear();
        state.settings_dirty = true;
        log::debug!(
            "Config change: section=settings, key={}, old={}, new={}",
            path,
            old_value.unwrap_or(Value::Null),
            value
        );

        if state.should_persist(persist) {
            self.persist_settings(state)?;
        }
        Ok(())
    }

    /// Writes the full settings tree to `settings.json`.
    pub fn save_settings(&self) -> StoreResult<()> {
        let mut state = self.lock();
        let result = self.persist_settings(&mut state);
        state.finish(result)
    }

    fn persist_settings(&self, state: &mut StoreState) -> StoreResult<()> {
        let path = self.user_path(SETTINGS_FILENAME);
        if let Err(e) = json_io::save_json(&state.settings, &path) {
            log::error!("Failed to save settings to '{}': {}", path.display(), e);
            return Err(e.into());
        }
        state.settings_dirty = false;
        log::info!("Settings saved to: {}", path.display());
        Ok(())
    }

    // --- Commands: reads ---

    /// Copy of one command.
    pub fn get_command(&self, description: &str) -> Option<CommandRecord> {
        self.lock().commands.get(description).cloned()
    }

    /// Point-in-time copy of every command, for matching or display.
    pub fn get_all_commands(&self) -> CommandMap {
        self.lock().commands.clone()
    }

    /// Phrases of one command; empty if it does not exist.
    pub fn command_phrases(&self, description: &str) -> Vec<String> {
        self.lock()
            .commands
            .get(description)
            .map(|record| record.phrases.clone())
            .unwrap_or_default()
    }

    /// Every non-blank phrase with its owner, sorted case-insensitively.
    pub fn all_phrases(&self) -> Vec<PhraseInfo> {
        let commands = self.get_all_commands();
        let mut phrases: Vec<PhraseInfo> = commands
            .iter()
            .flat_map(|(description, record)| {
                let display_command = truncate_for_display(&record.command);
                record
                    .phrases
                    .iter()
                    .map(|phrase| phrase.trim())
                    .filter(|phrase| !phrase.is_empty())
                    .map(move |phrase| PhraseInfo {
                        phrase: phrase.to_string(),
                        description: description.clone(),
                        action: record.action,
                        command: display_command.clone(),
                    })
            })
            .collect();
        phrases.sort_by_cached_key(|info| info.phrase.to_lowercase());
        phrases
    }

    /// Cross-command conflicts in the committed map. Empty when consistent.
    pub fn validate(&self) -> ConflictMap {
        conflict::validate_all(&self.lock().commands)
    }

    // --- Commands: mutations ---

    /// Adds a new command.
    ///
    /// # Errors
    /// * [`StoreError::Validation`] if the record is malformed.
    /// * [`StoreError::AlreadyExists`] if the description is taken.
    /// * [`StoreError::Conflict`] if any phrase belongs to another command;
    ///   nothing is changed in that case.
    /// * I/O errors from persisting; the in-memory insert is kept.
    pub fn add_command(
        &self,
        description: &str,
        record: CommandRecord,
        persist: Option<bool>,
    ) -> StoreResult<()> {
        let mut state = self.lock();
        let result = self.add_command_locked(&mut state, description, record, persist);
        state.finish(result)
    }

    fn add_command_locked(
        &self,
        state: &mut StoreState,
        description: &str,
        record: CommandRecord,
        persist: Option<bool>,
    ) -> StoreResult<()> {
        check_record(description, &record)?;
        if state.commands.contains_key(description) {
            log::warn!("Command '{}' already exists.", description);
            return Err(StoreError::AlreadyExists(description.to_string()));
        }
        reject_conflicts(description, &record, &state.commands, None)?;

        log::info!("Adding command: {}", description);
        state.insert_command(description, record);

        if state.should_persist(persist) {
            self.persist_commands(state)?;
        }
        Ok(())
    }

    /// Replaces an existing command. Its own current phrases never count as
    /// conflicts.
    ///
    /// # Errors
    /// As [`ConfigStore::add_command`], with [`StoreError::NotFound`] instead
    /// of `AlreadyExists`.
    pub fn update_command(
        &self,
        description: &str,
        record: CommandRecord,
        persist: Option<bool>,
    ) -> StoreResult<()> {
        let mut state = self.lock();
        let result = self.update_command_locked(&mut state, description, record, persist);
        state.finish(result)
    }

    fn update_command_locked(
        &self,
        state: &mut StoreState,
        description: &str,
        record: CommandRecord,
        persist: Option<bool>,
    ) -> StoreResult<()> {
        if !state.commands.contains_key(description) {
            log::error!("Command '{}' does not exist.", description);
            return Err(StoreError::NotFound(description.to_string()));
        }
        check_record(description, &record)?;
        reject_conflicts(description, &record, &state.commands, Some(description))?;

        log::info!("Updating command: {}", description);
        state.insert_command(description, record);

        if state.should_persist(persist) {
            self.persist_commands(state)?;
        }
        Ok(())
    }

    /// Deletes a command.
    pub fn remove_command(&self, description: &str, persist: Option<bool>) -> StoreResult<()> {
        let mut state = self.lock();
        let result = self.remove_command_locked(&mut state, description, persist);
        state.finish(result)
    }

    fn remove_command_locked(
        &self,
        state: &mut StoreState,
        description: &str,
        persist: Option<bool>,
    ) -> StoreResult<()> {
        if state.commands.remove(description).is_none() {
            log::warn!("Command '{}' does not exist.", description);
            return Err(StoreError::NotFound(description.to_string()));
        }
        log::info!("Removed command: {}", description);
        state.commands_dirty = true;

        if state.should_persist(persist) {
            self.persist_commands(state)?;
        }
        Ok(())
    }

    /// Writes the full command map to `commands.json`, after re-checking the
    /// whole map for cross-command conflicts. On conflict nothing is written.
    /// Entries skipped at load are written back unchanged.
    pub fn save_commands(&self) -> StoreResult<()> {
        let mut state = self.lock();
        let result = self.persist_commands(&mut state);
        state.finish(result)
    }

    fn persist_commands(&self, state: &mut StoreState) -> StoreResult<()> {
        let conflicts = conflict::validate_all(&state.commands);
        if !conflicts.is_empty() {
            let error = StoreError::Conflict { conflicts };
            log::warn!("Refusing to save commands: {}", error);
            return Err(error);
        }

        let mut document = match serde_json::to_value(&state.commands).map_err(JsonError::from)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (description, raw) in &state.unparsed {
            document
                .entry(description.clone())
                .or_insert_with(|| raw.clone());
        }

        let path = self.user_path(COMMANDS_FILENAME);
        if let Err(e) = json_io::save_json(&document, &path) {
            log::error!("Failed to save commands to '{}': {}", path.display(), e);
            return Err(e.into());
        }
        state.commands_dirty = false;
        log::info!("Commands saved to: {}", path.display());
        Ok(())
    }

    // --- Persistence control ---

    /// Whether mutations persist by default.
    pub fn auto_persist(&self) -> bool {
        self.lock().auto_persist
    }

    /// Turns default persistence on or off. Turning it off opens a window in
    /// which memory and disk differ until [`ConfigStore::flush`].
    pub fn set_auto_persist(&self, enabled: bool) {
        self.lock().auto_persist = enabled;
        log::info!("Auto-persist {}", if enabled { "enabled" } else { "disabled" });
    }

    /// True when memory holds changes not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        let state = self.lock();
        state.settings_dirty || state.commands_dirty
    }

    /// Writes whichever documents changed since they were last saved.
    pub fn flush(&self) -> StoreResult<()> {
        let mut state = self.lock();
        let result = self.flush_locked(&mut state);
        state.finish(result)
    }

    fn flush_locked(&self, state: &mut StoreState) -> StoreResult<()> {
        if state.settings_dirty {
            self.persist_settings(state)?;
        }
        if state.commands_dirty {
            self.persist_commands(state)?;
        }
        Ok(())
    }

    /// Drops all memoized setting lookups.
    pub fn clear_cache(&self) {
        self.lock().cache.clear();
        log::info!("Configuration cache cleared");
    }

    // --- Bulk operations ---

    /// Writes the selected scope to `path` as one JSON document. `All`
    /// produces `{"settings": ..., "commands": ...}`.
    pub fn export_config(&self, path: &Path, scope: ConfigScope) -> StoreResult<()> {
        let mut state = self.lock();
        let result = export_locked(&state, path, scope);
        if result.is_ok() {
            log::info!("Exported {} configuration to '{}'.", scope, path.display());
        }
        state.finish(result)
    }

    /// Loads the selected scope from a JSON file.
    ///
    /// With `merge == false` the scope is replaced wholesale. With
    /// `merge == true` commands are overlaid by description and settings are
    /// deep-merged.
    ///
    /// The import is all-or-nothing: every command entry must be valid and
    /// the resulting command map must be conflict-free, or nothing changes.
    pub fn import_config(&self, path: &Path, scope: ConfigScope, merge: bool) -> StoreResult<()> {
        let mut state = self.lock();
        let result = self.import_locked(&mut state, path, scope, merge);
        state.finish(result)
    }

    fn import_locked(
        &self,
        state: &mut StoreState,
        path: &Path,
        scope: ConfigScope,
        merge: bool,
    ) -> StoreResult<()> {
        let document = match json_io::load_json(path)? {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(StoreError::EmptyImport(path.to_path_buf())),
        };

        let (settings_part, commands_part) = split_scope(document, scope, path)?;

        let new_settings = settings_part.map(|incoming| {
            if merge {
                let mut merged = state.settings.clone();
                settings::deep_merge(&mut merged, incoming);
                merged
            } else {
                incoming
            }
        });

        let new_commands = match commands_part {
            Some(incoming) => {
                let parsed = parse_commands_strict(incoming)?;
                let combined = if merge {
                    let mut combined = state.commands.clone();
                    combined.extend(parsed);
                    combined
                } else {
                    parsed
                };
                let conflicts = conflict::validate_all(&combined);
                if !conflicts.is_empty() {
                    let error = StoreError::Conflict { conflicts };
                    log::warn!("Import from '{}' rejected: {}", path.display(), error);
                    return Err(error);
                }
                Some(combined)
            }
            None => None,
        };

        // --- Commit ---
        if let Some(settings) = new_settings {
            state.settings = settings;
            state.settings_dirty = true;
        }
        if let Some(commands) = new_commands {
            if merge {
                state.unparsed.retain(|description, _| !commands.contains_key(description));
            } else {
                state.unparsed.clear();
            }
            state.commands = commands;
            state.commands_dirty = true;
        }
        state.cache.clear();
        log::info!("Configuration imported from {}", path.display());

        if state.auto_persist {
            self.flush_locked(state)?;
        }
        Ok(())
    }

    /// Copies the user files into a backup directory and returns its path.
    /// Without `target`, a timestamped `Assistant_backup_<stamp>` directory is
    /// created next to the user config directory.
    pub fn backup(&self, target: Option<&Path>) -> StoreResult<PathBuf> {
        let mut state = self.lock();
        let result = self.backup_locked(target);
        state.finish(result)
    }

    fn backup_locked(&self, target: Option<&Path>) -> StoreResult<PathBuf> {
        let backup_dir = match target {
            Some(path) => path.to_path_buf(),
            None => {
                let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
                self.user_dir
                    .parent()
                    .unwrap_or(&self.user_dir)
                    .join(format!("{}{}", BACKUP_PREFIX, stamp))
            }
        };
        paths::ensure_dir(&backup_dir)?;

        for filename in CONFIG_FILENAMES {
            let source = self.user_path(filename);
            if !source.exists() {
                continue;
            }
            let destination = backup_dir.join(filename);
            fs::copy(&source, &destination).map_err(|e| StoreError::Io {
                path: destination.clone(),
                source: e,
            })?;
            log::info!("Backed up {}", filename);
        }

        log::info!("Configuration backup created: {}", backup_dir.display());
        Ok(backup_dir)
    }

    /// Copies the files found in a backup directory over the user files and
    /// reloads. Files missing from the backup are left as they are.
    pub fn restore(&self, backup_dir: &Path) -> StoreResult<LoadReport> {
        let mut state = self.lock();
        let result = self.restore_locked(&mut state, backup_dir);
        state.finish_reload(result)
    }

    fn restore_locked(&self, state: &mut StoreState, backup_dir: &Path) -> StoreResult<LoadReport> {
        if !backup_dir.is_dir() {
            log::error!("Backup path does not exist: {}", backup_dir.display());
            return Err(StoreError::BackupNotFound(backup_dir.to_path_buf()));
        }

        for filename in CONFIG_FILENAMES {
            let source = backup_dir.join(filename);
            if !source.exists() {
                continue;
            }
            let destination = self.user_path(filename);
            fs::copy(&source, &destination).map_err(|e| StoreError::Io {
                path: destination.clone(),
                source: e,
            })?;
            log::info!("Restored {}", filename);
        }

        let report = self.load_locked(state);
        log::info!("Configuration restored from: {}", backup_dir.display());
        Ok(report)
    }

    /// Deletes the user files, re-seeds them from the templates and reloads.
    pub fn reset_to_defaults(&self) -> StoreResult<LoadReport> {
        let mut state = self.lock();
        let result = self.reset_locked(&mut state);
        state.finish_reload(result)
    }

    fn reset_locked(&self, state: &mut StoreState) -> StoreResult<LoadReport> {
        for filename in CONFIG_FILENAMES {
            let user_path = self.user_path(filename);
            if user_path.exists() {
                fs::remove_file(&user_path).map_err(|e| StoreError::Io {
                    path: user_path.clone(),
                    source: e,
                })?;
                log::info!("Removed user config file: {}", user_path.display());
            }
        }
        paths::ensure_user_config_files(&self.user_dir, &self.template_dir)?;
        let report = self.load_locked(state);
        log::info!("Configuration reset to defaults");
        Ok(report)
    }

    /// Read-only view of the template documents. Missing or corrupt templates
    /// read as empty objects.
    pub fn template_config(&self, scope: ConfigScope) -> Value {
        let read = |filename: &str| {
            Value::Object(json_io::load_object_or_empty(
                &self.template_dir.join(filename),
            ))
        };
        match scope {
            ConfigScope::Settings => read(SETTINGS_FILENAME),
            ConfigScope::Commands => read(COMMANDS_FILENAME),
            ConfigScope::All => serde_json::json!({
                SETTINGS_SECTION: read(SETTINGS_FILENAME),
                COMMANDS_SECTION: read(COMMANDS_FILENAME),
            }),
        }
    }

    // --- Reporting ---

    /// Overview of the current state.
    pub fn summary(&self) -> ConfigSummary {
        let state = self.lock();
        ConfigSummary {
            settings_sections: state.settings.keys().cloned().collect(),
            settings_count: state.settings.len(),
            commands_count: state.commands.len(),
            command_descriptions: state.commands.keys().cloned().collect(),
            cache_size: state.cache.len(),
            auto_persist: state.auto_persist,
            dirty: state.settings_dirty || state.commands_dirty,
            user_config_dir: self.user_dir.clone(),
            template_config_dir: self.template_dir.clone(),
        }
    }

    /// The most recent failure as a human-readable message, followed by the
    /// conflicting phrases when the failure was a conflict. Empty after a
    /// successful operation.
    pub fn last_error_message(&self) -> String {
        let state = self.lock();
        let Some(last) = &state.last_error else {
            return String::new();
        };
        if last.conflicts.is_empty() {
            return last.message.clone();
        }
        let conflicts_text = format!("Conflicting phrases: {}", format_conflicts(&last.conflicts));
        if last.message.is_empty() {
            conflicts_text
        } else {
            format!("{}\n{}", last.message, conflicts_text)
        }
    }

    /// The structured conflict set of the most recent failure, if any.
    pub fn last_conflicts(&self) -> ConflictMap {
        self.lock()
            .last_error
            .as_ref()
            .map(|last| last.conflicts.clone())
            .unwrap_or_default()
    }
}

// --- Helpers ---

fn check_record(description: &str, record: &CommandRecord) -> StoreResult<()> {
    record.validate().map_err(|source| {
        log::error!("Invalid command data for '{}': {}", description, source);
        StoreError::Validation {
            description: description.to_string(),
            source,
        }
    })
}

fn reject_conflicts(
    description: &str,
    record: &CommandRecord,
    commands: &CommandMap,
    exclude: Option<&str>,
) -> StoreResult<()> {
    let conflicts = conflict::find_conflicts(description, &record.phrases, commands, exclude);
    if conflicts.is_empty() {
        return Ok(());
    }
    let error = StoreError::Conflict { conflicts };
    log::warn!("Command '{}' rejected: {}", description, error);
    Err(error)
}

/// Parses `commands.json` for loading. Returns the valid commands and, as
/// raw JSON, everything else: invalid entries and a stray `"settings"` key.
fn parse_commands_lenient(raw: Map<String, Value>) -> (CommandMap, Map<String, Value>) {
    let mut commands = CommandMap::new();
    let mut unparsed = Map::new();
    for (description, value) in raw {
        if description == SETTINGS_SECTION {
            unparsed.insert(description, value);
            continue;
        }
        match CommandRecord::from_value(&value) {
            Ok(record) => {
                commands.insert(description, record);
            }
            Err(e) => {
                log::warn!("Skipping invalid command '{}': {}", description, e);
                unparsed.insert(description, value);
            }
        }
    }
    (commands, unparsed)
}

/// Parses commands for import: the first invalid entry aborts.
fn parse_commands_strict(raw: Map<String, Value>) -> StoreResult<CommandMap> {
    raw.into_iter()
        .map(|(description, value)| match CommandRecord::from_value(&value) {
            Ok(record) => Ok((description, record)),
            Err(source) => Err(StoreError::Validation {
                description,
                source,
            }),
        })
        .collect()
}

type ScopeParts = (Option<Map<String, Value>>, Option<Map<String, Value>>);

/// Picks the settings and commands objects an import should apply.
fn split_scope(mut document: Map<String, Value>, scope: ConfigScope, path: &Path) -> StoreResult<ScopeParts> {
    let section = |document: &mut Map<String, Value>, key: &str| -> StoreResult<Option<Map<String, Value>>> {
        match document.remove(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(StoreError::EmptyImport(path.to_path_buf())),
        }
    };

    let parts = match scope {
        ConfigScope::Settings => (Some(document), None),
        ConfigScope::Commands => (None, Some(document)),
        ConfigScope::All => {
            let settings = section(&mut document, SETTINGS_SECTION)?;
            let commands = section(&mut document, COMMANDS_SECTION)?;
            if settings.is_none() && commands.is_none() {
                return Err(StoreError::EmptyImport(path.to_path_buf()));
            }
            (settings, commands)
        }
    };
    Ok(parts)
}

fn export_locked(state: &StoreState, path: &Path, scope: ConfigScope) -> StoreResult<()> {
    let settings = || Value::Object(state.settings.clone());
    let commands = || serde_json::to_value(&state.commands).map_err(JsonError::from);

    let document = match scope {
        ConfigScope::Settings => settings(),
        ConfigScope::Commands => commands()?,
        ConfigScope::All => serde_json::json!({
            SETTINGS_SECTION: settings(),
            COMMANDS_SECTION: commands()?,
        }),
    };
    json_io::save_json(&document, path)?;
    Ok(())
}

fn truncate_for_display(command: &str) -> String {
    if command.chars().count() <= DISPLAY_COMMAND_MAX_LEN {
        return command.to_string();
    }
    let truncated: String = command.chars().take(DISPLAY_COMMAND_MAX_LEN).collect();
    format!("{}...", truncated)
}
