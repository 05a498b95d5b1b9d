// src/core/resolver.rs

//! # Command Resolver
//!
//! Maps free-form spoken or typed text to at most one command.
//!
//! Phrases are compared trimmed and lower-cased, and every phrase contained
//! in the lower-cased input is a candidate. Candidates are ranked by:
//!
//! 1. whole-word matches (the phrase sits between `\b` boundaries) first,
//! 2. then longer phrases first, counting characters of the trimmed phrase,
//! 3. then description, ascending.
//!
//! The winner is cut out of the original text and the rest becomes the
//! *remainder*, which fills the command's `{query}` placeholders. The cut
//! removes the first whole-word occurrence, or the first raw occurrence when
//! there is none, so `"app"` in `"apple app store"` leaves `"apple store"`.
//! It is case-insensitive: a phrase stored as `"Open Browser"` still strips
//! `"open browser"` from the input.
//!
//! Resolution is pure and deterministic for a given snapshot: no I/O, no
//! locks, no shared state.

use crate::core::conflict::normalize_phrase;
use crate::models::CommandMap;
use regex::RegexBuilder;
use std::cmp::Ordering;

/// The command chosen for an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    /// Description (map key) of the winning command.
    pub description: String,
    /// The winning phrase, as stored on the command.
    pub phrase: String,
}

/// Outcome of resolving one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// `None` when no phrase occurs in the input.
    pub matched: Option<PhraseMatch>,
    /// The input minus the matched phrase, trimmed. Without a match this is
    /// the whole input, trimmed.
    pub remainder: String,
}

impl Resolution {
    /// True when a command was found.
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

#[derive(Debug)]
struct Candidate<'a> {
    description: &'a str,
    phrase: &'a str,
    length: usize,
    word_boundary: bool,
}

impl Candidate<'_> {
    /// Total order of candidates: best first.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .word_boundary
            .cmp(&self.word_boundary)
            .then_with(|| other.length.cmp(&self.length))
            .then_with(|| self.description.cmp(other.description))
    }
}

/// Resolves `text` against a committed snapshot of the command map.
pub fn resolve(text: &str, commands: &CommandMap) -> Resolution {
    let original = text.trim();
    let haystack = original.to_lowercase();

    let mut candidates = Vec::new();
    for (description, record) in commands {
        for phrase in &record.phrases {
            let needle = normalize_phrase(phrase);
            if needle.is_empty() || !haystack.contains(&needle) {
                continue;
            }
            candidates.push(Candidate {
                description,
                phrase: phrase.as_str(),
                length: needle.chars().count(),
                word_boundary: is_word_boundary_match(&haystack, &needle),
            });
        }
    }

    let Some(best) = candidates.into_iter().min_by(|a, b| a.rank(b)) else {
        log::debug!("No command phrase found in '{}'.", original);
        return Resolution {
            matched: None,
            remainder: original.to_string(),
        };
    };

    log::debug!(
        "Resolved '{}' to '{}' via phrase '{}' (whole word: {}).",
        original,
        best.description,
        best.phrase,
        best.word_boundary
    );

    Resolution {
        remainder: strip_first_occurrence(original, best.phrase.trim()),
        matched: Some(PhraseMatch {
            description: best.description.to_string(),
            phrase: best.phrase.to_string(),
        }),
    }
}

/// True when `pattern` occurs in `text` delimited by word boundaries, the
/// same as searching for `\b<escaped pattern>\b`.
pub fn is_word_boundary_match(text: &str, pattern: &str) -> bool {
    let expression = format!(r"\b{}\b", regex::escape(pattern));
    match RegexBuilder::new(&expression).build() {
        Ok(re) => re.is_match(text),
        Err(e) => {
            log::warn!("Could not build boundary matcher for '{}': {}", pattern, e);
            false
        }
    }
}

/// Removes the first case-insensitive occurrence of `phrase` from `text`,
/// preferring one between word boundaries, and joins what is left with a
/// single space at the cut.
fn strip_first_occurrence(text: &str, phrase: &str) -> String {
    let escaped = regex::escape(phrase);
    let find = |expression: &str| {
        RegexBuilder::new(expression)
            .case_insensitive(true)
            .build()
            .ok()
            .and_then(|re| re.find(text))
    };
    let found = find(&format!(r"\b{}\b", escaped)).or_else(|| find(&escaped));

    let Some(found) = found else {
        return text.trim().to_string();
    };

    let head = text.get(..found.start()).unwrap_or_default().trim();
    let tail = text.get(found.end()..).unwrap_or_default().trim();
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, tail),
    }
}
