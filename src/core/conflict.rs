// src/core/conflict.rs

//! # Phrase Conflict Detection
//!
//! Two commands conflict when they own phrases that are equal after trimming
//! and lower-casing. A command may repeat case variants of its own phrases;
//! only collisions with *other* commands count.
//!
//! Everything here is pure: it reads the command map it is handed and never
//! touches the store, the lock or the disk.
//!
//! ## Tie-break
//!
//! [`CommandMap`] iterates in ascending description order, so when one phrase
//! collides with several owners the owner with the smallest description is
//! the one reported.

use crate::models::{CommandMap, ConflictMap};
use std::collections::btree_map::Entry;

/// The comparison form of a phrase: trimmed and lower-cased.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

/// Finds candidate phrases already owned by other commands.
///
/// # Arguments
/// * `candidate_description` - The command being added or updated.
/// * `candidate_phrases` - Its proposed phrases.
/// * `commands` - The committed command map to check against.
/// * `exclude_description` - A command to skip, normally the candidate's own
///   current entry during an update.
///
/// # Returns
/// Conflicting phrase (trimmed, as the candidate spelled it) -> owning
/// description. Blank phrases never conflict.
pub fn find_conflicts(
    candidate_description: &str,
    candidate_phrases: &[String],
    commands: &CommandMap,
    exclude_description: Option<&str>,
) -> ConflictMap {
    let mut conflicts = ConflictMap::new();

    let candidates: Vec<(&str, String)> = candidate_phrases
        .iter()
        .map(|raw| (raw.trim(), normalize_phrase(raw)))
        .filter(|(_, normalized)| !normalized.is_empty())
        .collect();
    if candidates.is_empty() {
        return conflicts;
    }

    for (owner, record) in commands {
        if exclude_description == Some(owner.as_str()) {
            continue;
        }
        for existing in &record.phrases {
            let existing_norm = normalize_phrase(existing);
            if existing_norm.is_empty() {
                continue;
            }
            for (raw, normalized) in &candidates {
                if *normalized != existing_norm {
                    continue;
                }
                if let Entry::Vacant(slot) = conflicts.entry(raw.to_string()) {
                    log::trace!(
                        "Phrase '{}' of '{}' collides with '{}'.",
                        raw,
                        candidate_description,
                        owner
                    );
                    slot.insert(owner.clone());
                }
            }
        }
    }

    conflicts
}

/// Sweeps the whole map: every command is checked against all the others.
/// The union keeps the first owner seen for each phrase. An empty result
/// means the uniqueness invariant holds.
pub fn validate_all(commands: &CommandMap) -> ConflictMap {
    let mut all = ConflictMap::new();
    for (description, record) in commands {
        let found = find_conflicts(description, &record.phrases, commands, Some(description));
        for (phrase, owner) in found {
            all.entry(phrase).or_insert(owner);
        }
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, CommandRecord};

    fn record(phrases: &[&str]) -> CommandRecord {
        CommandRecord::new(
            phrases.iter().map(|p| p.to_string()).collect(),
            Action::Command,
            "run",
        )
    }

    fn map(entries: &[(&str, &[&str])]) -> CommandMap {
        entries
            .iter()
            .map(|(desc, phrases)| (desc.to_string(), record(phrases)))
            .collect()
    }

    #[test]
    fn test_conflict_is_reported_with_candidate_spelling() {
        let commands = map(&[("Open Notepad", &["notepad", "open notepad"])]);
        let conflicts = find_conflicts(
            "Launch Notepad",
            &["  NotePad ".to_string(), "launch it".to_string()],
            &commands,
            None,
        );
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts.get("NotePad").map(String::as_str), Some("Open Notepad"));
    }

    #[test]
    fn test_excluded_command_is_ignored() {
        let commands = map(&[("X", &["go"])]);
        let conflicts = find_conflicts("X", &["go".to_string()], &commands, Some("X"));
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_first_owner_in_description_order_wins() {
        let commands = map(&[("Beta", &["start"]), ("Alpha", &["Start"])]);
        let conflicts = find_conflicts("Gamma", &["start".to_string()], &commands, None);
        assert_eq!(conflicts.get("start").map(String::as_str), Some("Alpha"));
    }

    #[test]
    fn test_blank_phrases_never_conflict() {
        let commands = map(&[("A", &["  "])]);
        let conflicts = find_conflicts("B", &["".to_string(), " ".to_string()], &commands, None);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_validate_all_finds_cross_command_duplicates_only() {
        let clean = map(&[("A", &["copy", "COPY"]), ("B", &["paste"])]);
        assert!(validate_all(&clean).is_empty());

        let dirty = map(&[("A", &["copy"]), ("B", &["paste", " Copy "])]);
        let conflicts = validate_all(&dirty);
        // Sweeping A first reports its phrase as owned by B.
        assert_eq!(conflicts.get("copy").map(String::as_str), Some("B"));
        assert_eq!(conflicts.get("Copy").map(String::as_str), Some("A"));
    }
}
