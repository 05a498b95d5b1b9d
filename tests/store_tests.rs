// tests/store_tests.rs

use assistant::core::paths::FixedPaths;
use assistant::core::store::{ConfigStore, StoreError, StoreOptions};
use assistant::models::{Action, CommandRecord, ConfigScope};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    // Held for its Drop.
    _root: TempDir,
    user_dir: PathBuf,
    template_dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let user_dir = root.path().join("user").join("Assistant");
        let template_dir = root.path().join("templates");
        fs::create_dir_all(&template_dir).unwrap();
        Self {
            _root: root,
            user_dir,
            template_dir,
        }
    }

    fn with_templates(settings: Value, commands: Value) -> Self {
        let fixture = Self::new();
        write_json(&fixture.template_dir.join("settings.json"), &settings);
        write_json(&fixture.template_dir.join("commands.json"), &commands);
        fixture
    }

    fn paths(&self) -> FixedPaths {
        FixedPaths::new(&self.user_dir, &self.template_dir)
    }

    fn open(&self) -> ConfigStore {
        ConfigStore::open(&self.paths()).unwrap()
    }

    fn open_manual(&self) -> ConfigStore {
        ConfigStore::open_with(&self.paths(), StoreOptions { auto_persist: false }).unwrap()
    }

    fn user_file(&self, name: &str) -> PathBuf {
        self.user_dir.join(name)
    }

    fn read_user(&self, name: &str) -> Value {
        serde_json::from_str(&fs::read_to_string(self.user_file(name)).unwrap()).unwrap()
    }
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn record(phrases: &[&str], action: Action, command: &str) -> CommandRecord {
    CommandRecord::new(phrases.iter().map(|p| p.to_string()).collect(), action, command)
}

fn notepad_templates() -> Fixture {
    Fixture::with_templates(
        json!({ "Speech_Recognition": { "Energy_Threshold": 300 } }),
        json!({
            "Open Notepad": {
                "Phrases": ["notepad", "open notepad"],
                "Action": "command",
                "Command": "notepad.exe"
            }
        }),
    )
}

// --- Bootstrap & loading ---

#[test]
fn test_first_run_seeds_user_files_from_templates() {
    let fixture = notepad_templates();
    let store = fixture.open();

    assert!(fixture.user_file("settings.json").exists());
    assert!(fixture.user_file("commands.json").exists());
    assert_eq!(store.get_setting("Speech_Recognition.Energy_Threshold", json!(0)), json!(300));
    assert!(store.get_command("Open Notepad").is_some());
}

#[test]
fn test_missing_templates_yield_empty_documents() {
    let fixture = Fixture::new();
    let store = fixture.open();

    assert!(store.get_all_commands().is_empty());
    assert_eq!(fixture.read_user("commands.json"), json!({}));
    assert_eq!(store.get_setting("Anything", json!("default")), json!("default"));
}

#[test]
fn test_corrupt_commands_file_degrades_to_empty_map() {
    let fixture = Fixture::new();
    fs::create_dir_all(&fixture.user_dir).unwrap();
    fs::write(fixture.user_file("commands.json"), "{ this is not json").unwrap();

    let store = fixture.open();

    assert!(store.get_all_commands().is_empty());
}

#[test]
fn test_invalid_entries_are_skipped_on_load() {
    let fixture = Fixture::with_templates(
        json!({}),
        json!({
            "settings": { "Stray": true },
            "Good": { "Phrases": ["good"], "Action": "keys", "Command": "ctrl+g" },
            "No Action": { "Phrases": ["bad"], "Command": "x" },
            "Bad Action": { "Phrases": ["worse"], "Action": "teleport", "Command": "x" }
        }),
    );
    let store = fixture.open();
    let report = store.load();

    assert_eq!(report.commands_loaded, 1);
    assert_eq!(report.commands_skipped, 2);
    assert_eq!(store.get_all_commands().keys().collect::<Vec<_>>(), vec!["Good"]);
}

#[test]
fn test_skipped_entries_survive_the_next_save() {
    let fixture = Fixture::new();
    fs::create_dir_all(&fixture.user_dir).unwrap();
    let hand_edited = json!({ "Action": "command", "Command": "make deploy" });
    write_json(
        &fixture.user_file("commands.json"),
        &json!({
            "Good": { "Phrases": ["good"], "Action": "keys", "Command": "ctrl+g" },
            "Hand Edited": hand_edited,
        }),
    );

    let store = fixture.open();
    assert!(store.last_error_message().contains("Hand Edited"));
    assert!(store.get_command("Hand Edited").is_none());

    store
        .add_command("Other", record(&["other"], Action::Keys, "ctrl+o"), None)
        .unwrap();

    let on_disk = fixture.read_user("commands.json");
    assert_eq!(on_disk["Hand Edited"], hand_edited);
    assert!(on_disk.get("Good").is_some());
    assert!(on_disk.get("Other").is_some());
}

#[test]
fn test_adding_a_skipped_description_replaces_the_raw_entry() {
    let fixture = Fixture::new();
    fs::create_dir_all(&fixture.user_dir).unwrap();
    write_json(
        &fixture.user_file("commands.json"),
        &json!({ "Broken": { "Phrases": [], "Action": "keys", "Command": "ctrl+b" } }),
    );
    let store = fixture.open();

    store
        .add_command("Broken", record(&["fixed"], Action::Keys, "ctrl+f"), None)
        .unwrap();
    store.remove_command("Broken", None).unwrap();

    assert_eq!(fixture.read_user("commands.json"), json!({}));
}

#[test]
fn test_save_refuses_a_conflicting_map_loaded_from_disk() {
    let fixture = Fixture::new();
    fs::create_dir_all(&fixture.user_dir).unwrap();
    write_json(
        &fixture.user_file("commands.json"),
        &json!({
            "Alpha": { "Phrases": ["go"], "Action": "keys", "Command": "ctrl+a" },
            "Beta": { "Phrases": ["go"], "Action": "keys", "Command": "ctrl+b" }
        }),
    );
    let store = fixture.open();
    let before = fs::read(fixture.user_file("commands.json")).unwrap();

    let result = store.save_commands();

    assert!(matches!(result, Err(StoreError::Conflict { .. })));
    assert_eq!(fs::read(fixture.user_file("commands.json")).unwrap(), before);
    let conflicts = store.last_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts.values().all(|owner| owner == "Alpha" || owner == "Beta"));
    assert!(store.last_error_message().contains("Conflicting phrases:"));
}

#[test]
fn test_failed_settings_write_keeps_memory_and_dirty_flag() {
    let fixture = Fixture::new();
    let store = fixture.open();
    // A directory in place of the file makes the atomic swap fail.
    fs::remove_file(fixture.user_file("settings.json")).unwrap();
    fs::create_dir(fixture.user_file("settings.json")).unwrap();

    let result = store.set_setting("Language", json!("es-ES"), Some(true));

    assert!(matches!(result, Err(StoreError::Json(_))));
    assert_eq!(store.get_setting("Language", Value::Null), json!("es-ES"));
    assert!(store.is_dirty());
    assert!(store.save_settings().is_err());
    assert!(store.is_dirty());
    assert!(!store.last_error_message().is_empty());
}

// --- Commands ---

#[test]
fn test_conflicting_add_is_rejected_and_map_unchanged() {
    let fixture = notepad_templates();
    let store = fixture.open();

    let result = store.add_command(
        "Launch Notepad",
        record(&["notepad"], Action::Command, "notepad.exe"),
        None,
    );

    let Err(StoreError::Conflict { conflicts }) = result else {
        panic!("expected a conflict, got {:?}", result);
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts.get("notepad").map(String::as_str), Some("Open Notepad"));
    assert_eq!(
        store.get_all_commands().keys().collect::<Vec<_>>(),
        vec!["Open Notepad"]
    );
    assert_eq!(store.last_conflicts(), conflicts);

    let message = store.last_error_message();
    assert!(message.contains("Duplicate phrase"));
    assert!(message.contains("Conflicting phrases: 'notepad' -> Open Notepad"));

    // The file on disk was not touched either.
    let on_disk = fixture.read_user("commands.json");
    assert!(on_disk.get("Launch Notepad").is_none());
}

#[test]
fn test_conflict_detection_ignores_case_and_whitespace() {
    let fixture = notepad_templates();
    let store = fixture.open();

    let result = store.add_command(
        "Other",
        record(&["  NOTEPAD  ", "fresh phrase"], Action::Command, "x"),
        None,
    );
    assert!(matches!(result, Err(StoreError::Conflict { .. })));
    assert_eq!(
        store.last_conflicts().get("NOTEPAD").map(String::as_str),
        Some("Open Notepad")
    );
}

#[test]
fn test_add_persists_and_round_trips() {
    let fixture = Fixture::new();
    let store = fixture.open();
    let search = record(
        &["search google", "Google"],
        Action::Browser,
        "https://www.google.com/search?q={query}",
    );

    store.add_command("Search Google", search.clone(), None).unwrap();
    store.add_command("New Tab", record(&["new tab"], Action::Keys, "ctrl+t"), None).unwrap();
    assert!(store.last_error_message().is_empty());

    let reopened = fixture.open();
    let commands = reopened.get_all_commands();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands.get("Search Google"), Some(&search));
    assert_eq!(
        fixture.read_user("commands.json")["Search Google"]["Phrases"],
        json!(["search google", "Google"])
    );
}

#[test]
fn test_add_rejects_invalid_and_duplicate_descriptions() {
    let fixture = notepad_templates();
    let store = fixture.open();

    let invalid = store.add_command("Empty", record(&[], Action::Keys, "ctrl+e"), None);
    assert!(matches!(invalid, Err(StoreError::Validation { .. })));
    assert!(store.last_error_message().contains("at least one phrase"));

    let blank = store.add_command("Blank", record(&["ok"], Action::Keys, "  "), None);
    assert!(matches!(blank, Err(StoreError::Validation { .. })));

    let duplicate = store.add_command(
        "Open Notepad",
        record(&["something else"], Action::Command, "notepad.exe"),
        None,
    );
    assert!(matches!(duplicate, Err(StoreError::AlreadyExists(_))));
    assert_eq!(store.get_all_commands().len(), 1);
}

#[test]
fn test_update_does_not_conflict_with_itself() {
    let fixture = Fixture::with_templates(
        json!({}),
        json!({ "X": { "Phrases": ["go"], "Action": "keys", "Command": "enter" } }),
    );
    let store = fixture.open();

    store
        .update_command("X", record(&["go", "Go Now"], Action::Keys, "enter"), None)
        .unwrap();

    assert_eq!(store.command_phrases("X"), vec!["go", "Go Now"]);
}

#[test]
fn test_update_and_remove_of_missing_command_fail() {
    let fixture = Fixture::new();
    let store = fixture.open();

    let update = store.update_command("Ghost", record(&["boo"], Action::Keys, "x"), None);
    assert!(matches!(update, Err(StoreError::NotFound(_))));
    assert_eq!(store.last_error_message(), "Command 'Ghost' does not exist.");

    let remove = store.remove_command("Ghost", None);
    assert!(matches!(remove, Err(StoreError::NotFound(_))));
}

#[test]
fn test_update_still_checks_other_commands() {
    let fixture = Fixture::with_templates(
        json!({}),
        json!({
            "A": { "Phrases": ["alpha"], "Action": "keys", "Command": "a" },
            "B": { "Phrases": ["beta"], "Action": "keys", "Command": "b" }
        }),
    );
    let store = fixture.open();

    let result = store.update_command("B", record(&["beta", "Alpha"], Action::Keys, "b"), None);

    assert!(matches!(result, Err(StoreError::Conflict { .. })));
    assert_eq!(store.command_phrases("B"), vec!["beta"]);
}

#[test]
fn test_remove_deletes_from_memory_and_disk() {
    let fixture = notepad_templates();
    let store = fixture.open();

    store.remove_command("Open Notepad", None).unwrap();

    assert!(store.get_command("Open Notepad").is_none());
    assert_eq!(fixture.read_user("commands.json"), json!({}));
}

#[test]
fn test_returned_commands_are_independent_copies() {
    let fixture = notepad_templates();
    let store = fixture.open();

    let mut snapshot = store.get_all_commands();
    snapshot.clear();
    let mut one = store.get_command("Open Notepad").unwrap();
    one.phrases.push("mutated".into());

    assert_eq!(store.command_phrases("Open Notepad"), vec!["notepad", "open notepad"]);
}

#[test]
fn test_all_phrases_are_sorted_and_truncated() {
    let long_command = format!("https://example.com/{}", "a".repeat(100));
    let fixture = Fixture::with_templates(
        json!({}),
        json!({
            "Zed": { "Phrases": ["beta", " "], "Action": "keys", "Command": "z" },
            "Long": { "Phrases": ["Alpha"], "Action": "browser", "Command": long_command }
        }),
    );
    // The blank phrase makes "Zed" invalid, so it is skipped on load.
    let store = fixture.open();
    store
        .add_command("Zed", record(&["beta", "Gamma"], Action::Keys, "z"), None)
        .unwrap();

    let phrases = store.all_phrases();
    let order: Vec<&str> = phrases.iter().map(|p| p.phrase.as_str()).collect();
    assert_eq!(order, vec!["Alpha", "beta", "Gamma"]);
    assert_eq!(phrases[0].command.chars().count(), 83);
    assert!(phrases[0].command.ends_with("..."));
    assert_eq!(phrases[1].description, "Zed");
}

// --- Settings ---

#[test]
fn test_set_setting_creates_sections_and_persists() {
    let fixture = Fixture::new();
    let store = fixture.open();

    store
        .set_setting("Floating_Icon.Position.Offset_X", json!(120), None)
        .unwrap();

    assert_eq!(store.get_setting("Floating_Icon.Position.Offset_X", json!(0)), json!(120));
    assert_eq!(store.get_setting_as::<i64>("Floating_Icon.Position.Offset_X", 0), 120);
    assert_eq!(
        fixture.read_user("settings.json"),
        json!({ "Floating_Icon": { "Position": { "Offset_X": 120 } } })
    );
}

#[test]
fn test_cached_reads_see_later_writes() {
    let fixture = Fixture::with_templates(json!({ "Audio": { "Rate": 16000 } }), json!({}));
    let store = fixture.open();

    assert_eq!(store.get_setting("Audio.Rate", Value::Null), json!(16000));
    assert_eq!(store.get_setting("Audio", Value::Null), json!({ "Rate": 16000 }));

    store.set_setting("Audio.Rate", json!(44100), Some(false)).unwrap();

    assert_eq!(store.get_setting("Audio.Rate", Value::Null), json!(44100));
    assert_eq!(store.get_setting("Audio", Value::Null), json!({ "Rate": 44100 }));
}

#[test]
fn test_typed_read_falls_back_on_mismatch() {
    let fixture = Fixture::with_templates(json!({ "Language": "en-US" }), json!({}));
    let store = fixture.open();

    assert_eq!(store.get_setting_as::<u32>("Language", 7), 7);
    assert_eq!(
        store.get_setting_as::<String>("Language", String::new()),
        "en-US"
    );
}

#[test]
fn test_setting_through_a_scalar_is_rejected() {
    let fixture = Fixture::with_templates(json!({ "Theme": "dark" }), json!({}));
    let store = fixture.open();

    let result = store.set_setting("Theme.Accent", json!("blue"), None);

    assert!(matches!(result, Err(StoreError::SettingPath { .. })));
    assert_eq!(store.get_setting("Theme", Value::Null), json!("dark"));
}

#[test]
fn test_settings_section_copy() {
    let fixture = notepad_templates();
    let store = fixture.open();

    let section = store.settings_section("Speech_Recognition");
    assert_eq!(section.get("Energy_Threshold"), Some(&json!(300)));
    assert!(store.settings_section("Missing").is_empty());
}

// --- Deferred persistence ---

#[test]
fn test_manual_mode_defers_writes_until_flush() {
    let fixture = notepad_templates();
    let store = fixture.open_manual();

    store
        .add_command("New Tab", record(&["new tab"], Action::Keys, "ctrl+t"), None)
        .unwrap();
    store.set_setting("Language", json!("es-ES"), None).unwrap();

    assert!(store.is_dirty());
    assert!(fixture.read_user("commands.json").get("New Tab").is_none());

    store.flush().unwrap();

    assert!(!store.is_dirty());
    assert!(fixture.read_user("commands.json").get("New Tab").is_some());
    assert_eq!(fixture.read_user("settings.json")["Language"], json!("es-ES"));
}

#[test]
fn test_explicit_persist_overrides_auto_persist() {
    let fixture = Fixture::new();
    let store = fixture.open();

    store.set_setting("Volume", json!(3), Some(false)).unwrap();
    assert!(store.is_dirty());
    assert_eq!(fixture.read_user("settings.json"), json!({}));

    store.set_auto_persist(false);
    store.set_setting("Volume", json!(4), Some(true)).unwrap();
    assert!(!store.is_dirty());
    assert_eq!(fixture.read_user("settings.json"), json!({ "Volume": 4 }));
}

#[test]
fn test_reload_discards_unsaved_changes() {
    let fixture = notepad_templates();
    let store = fixture.open_manual();
    store.remove_command("Open Notepad", None).unwrap();

    store.reload_all();

    assert!(store.get_command("Open Notepad").is_some());
    assert!(!store.is_dirty());
}

// --- Import / export ---

#[test]
fn test_export_then_import_into_fresh_store() {
    let source = notepad_templates();
    let exported = source._root.path().join("export.json");
    source.open().export_config(&exported, ConfigScope::All).unwrap();

    let document: Value = serde_json::from_str(&fs::read_to_string(&exported).unwrap()).unwrap();
    assert!(document.get("settings").is_some());
    assert!(document.get("commands").is_some());

    let target = Fixture::new();
    let store = target.open();
    store.import_config(&exported, ConfigScope::All, false).unwrap();

    assert!(store.get_command("Open Notepad").is_some());
    assert_eq!(store.get_setting("Speech_Recognition.Energy_Threshold", Value::Null), json!(300));
    assert!(target.read_user("commands.json").get("Open Notepad").is_some());
}

#[test]
fn test_import_with_conflicts_changes_nothing() {
    let fixture = notepad_templates();
    let store = fixture.open();
    let incoming = fixture._root.path().join("incoming.json");
    write_json(
        &incoming,
        &json!({
            "Launch Notepad": { "Phrases": ["Notepad"], "Action": "command", "Command": "np" }
        }),
    );

    let result = store.import_config(&incoming, ConfigScope::Commands, true);

    assert!(matches!(result, Err(StoreError::Conflict { .. })));
    assert_eq!(store.get_all_commands().len(), 1);
}

#[test]
fn test_import_with_invalid_entry_changes_nothing() {
    let fixture = notepad_templates();
    let store = fixture.open();
    let incoming = fixture._root.path().join("incoming.json");
    write_json(
        &incoming,
        &json!({
            "Fine": { "Phrases": ["fine"], "Action": "keys", "Command": "f" },
            "Broken": { "Phrases": ["broken"], "Action": "keys" }
        }),
    );

    let result = store.import_config(&incoming, ConfigScope::Commands, false);

    assert!(matches!(result, Err(StoreError::Validation { ref description, .. }) if description == "Broken"));
    assert!(store.get_command("Fine").is_none());
    assert!(store.get_command("Open Notepad").is_some());
}

#[test]
fn test_settings_import_merge_is_deep() {
    let fixture = Fixture::with_templates(
        json!({ "Audio": { "Rate": 16000, "Channels": 1 } }),
        json!({}),
    );
    let store = fixture.open();
    let incoming = fixture._root.path().join("settings_patch.json");
    write_json(&incoming, &json!({ "Audio": { "Rate": 44100 } }));

    store.import_config(&incoming, ConfigScope::Settings, true).unwrap();

    assert_eq!(store.get_setting("Audio", Value::Null), json!({ "Rate": 44100, "Channels": 1 }));
}

#[test]
fn test_import_of_missing_or_empty_file_fails() {
    let fixture = Fixture::new();
    let store = fixture.open();

    let missing = store.import_config(Path::new("/definitely/not/here.json"), ConfigScope::All, false);
    assert!(matches!(missing, Err(StoreError::Json(_))));

    let empty = fixture._root.path().join("empty.json");
    write_json(&empty, &json!({}));
    let result = store.import_config(&empty, ConfigScope::All, false);
    assert!(matches!(result, Err(StoreError::EmptyImport(_))));
}

// --- Backup / restore / reset ---

#[test]
fn test_backup_and_restore() {
    let fixture = notepad_templates();
    let store = fixture.open();
    let backup_dir = fixture._root.path().join("backup");

    let created = store.backup(Some(&backup_dir)).unwrap();
    assert_eq!(created, backup_dir);
    assert!(backup_dir.join("commands.json").exists());
    assert!(backup_dir.join("settings.json").exists());

    store.remove_command("Open Notepad", None).unwrap();
    assert!(store.get_all_commands().is_empty());

    let report = store.restore(&backup_dir).unwrap();

    assert_eq!(report.commands_loaded, 1);
    assert!(store.get_command("Open Notepad").is_some());
}

#[test]
fn test_default_backup_is_timestamped_next_to_config() {
    let fixture = notepad_templates();
    let store = fixture.open();

    let created = store.backup(None).unwrap();

    assert_eq!(created.parent(), fixture.user_dir.parent());
    let name = created.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("Assistant_backup_"), "unexpected name {}", name);
    assert!(created.join("commands.json").exists());
}

#[test]
fn test_restore_from_missing_dir_fails() {
    let fixture = Fixture::new();
    let store = fixture.open();

    let result = store.restore(&fixture._root.path().join("nope"));

    assert!(matches!(result, Err(StoreError::BackupNotFound(_))));
}

#[test]
fn test_reset_to_defaults_restores_templates() {
    let fixture = notepad_templates();
    let store = fixture.open();
    store.remove_command("Open Notepad", None).unwrap();
    store.set_setting("Extra", json!(true), None).unwrap();

    store.reset_to_defaults().unwrap();

    assert!(store.get_command("Open Notepad").is_some());
    assert_eq!(store.get_setting("Extra", Value::Null), Value::Null);
    assert_eq!(
        store.template_config(ConfigScope::Commands),
        fixture.read_user("commands.json")
    );
}

#[test]
fn test_summary_reports_state() {
    let fixture = notepad_templates();
    let store = fixture.open();
    store.get_setting("Speech_Recognition.Energy_Threshold", Value::Null);

    let summary = store.summary();

    assert_eq!(summary.commands_count, 1);
    assert_eq!(summary.command_descriptions, vec!["Open Notepad"]);
    assert_eq!(summary.settings_sections, vec!["Speech_Recognition"]);
    assert_eq!(summary.cache_size, 1);
    assert!(summary.auto_persist);
    assert_eq!(summary.user_config_dir, fixture.user_dir);

    store.clear_cache();
    assert_eq!(store.summary().cache_size, 0);
}

// --- Concurrency ---

#[test]
fn test_concurrent_adds_keep_phrases_unique() {
    let fixture = Fixture::new();
    let store = Arc::new(fixture.open_manual());

    // Every thread races to claim the same shared phrase plus one of its own.
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                store
                    .add_command(
                        &format!("Command {}", i),
                        record(&["shared", &format!("own {}", i)], Action::Keys, "x"),
                        None,
                    )
                    .is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(store.get_all_commands().len(), 1);
    assert!(store.validate().is_empty());
}
