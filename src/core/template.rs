// src/core/template.rs

//! Placeholder substitution for `browser` and `command` templates.
//!
//! | Token             | Replaced with                                   |
//! |-------------------|-------------------------------------------------|
//! | `{query}`         | the remainder, spaces turned into `+`           |
//! | `{raw_query}`     | the remainder, verbatim                         |
//! | `{encoded_query}` | the remainder, percent-encoded, spaces as `+`   |

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{(query|raw_query|encoded_query)\}").unwrap_or_else(|_| unreachable!());
}

/// Expands every placeholder in `template` with `query` in a single pass, so
/// text coming from the query is never expanded again.
pub fn format_command(template: &str, query: &str) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match caps.get(1).map(|m| m.as_str()) {
            Some("query") => query.replace(' ', "+"),
            Some("raw_query") => query.to_string(),
            Some("encoded_query") => encode_query(query),
            _ => caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default(),
        })
        .into_owned()
}

/// Form-style percent-encoding: reserved bytes become `%XX`, spaces `+`.
pub fn encode_query(query: &str) -> String {
    urlencoding::encode(query).replace("%20", "+")
}

/// Splits a `keys` command such as `"Ctrl + Shift + T"` into normalized key
/// names (`["ctrl", "shift", "t"]`). Empty segments are dropped.
pub fn parse_key_chord(chord: &str) -> Vec<String> {
    chord
        .split('+')
        .map(|key| key.trim().to_lowercase())
        .filter(|key| !key.is_empty())
        .collect()
}
