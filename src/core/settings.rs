// src/core/settings.rs

//! Dot-path access to the nested settings tree
//! (`Floating_Icon.Position.Offset_X`).

use serde_json::{Map, Value};
use thiserror::Error;

/// Why a settings write could not be applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingPathError {
    #[error("setting path is empty")]
    Empty,
    #[error("path contains an empty segment")]
    EmptySegment,
    #[error("'{segment}' holds {found}, not a section")]
    NotASection { segment: String, found: &'static str },
}

/// Splits a dot path into its segments.
fn segments(path: &str) -> Result<Vec<&str>, SettingPathError> {
    if path.trim().is_empty() {
        return Err(SettingPathError::Empty);
    }
    let parts: Vec<&str> = path.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(SettingPathError::EmptySegment);
    }
    Ok(parts)
}

/// Walks `path` through nested objects. Any missing key, or a non-object
/// where an object was needed, yields `None`.
pub fn get_path<'a>(tree: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let parts = segments(path).ok()?;
    let (first, rest) = parts.split_first()?;
    let mut current = tree.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// Writes `value` at `path`, creating intermediate sections as needed.
/// Returns the value previously stored there, if any.
///
/// An intermediate segment that already holds a scalar or list is not
/// overwritten; the write is refused instead.
pub fn set_path(
    tree: &mut Map<String, Value>,
    path: &str,
    value: Value,
) -> Result<Option<Value>, SettingPathError> {
    let parts = segments(path)?;
    let (leaf, parents) = parts.split_last().ok_or(SettingPathError::Empty)?;

    let mut current = tree;
    for segment in parents {
        let node = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match node {
            Value::Object(map) => map,
            other => {
                return Err(SettingPathError::NotASection {
                    segment: segment.to_string(),
                    found: crate::core::json_io::json_type_name(other),
                });
            }
        };
    }
    Ok(current.insert(leaf.to_string(), value))
}

/// Recursively overlays `overlay` onto `base`: nested objects are merged key
/// by key, everything else is replaced.
pub fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, incoming) in overlay {
        match incoming {
            Value::Object(nested) => {
                if let Some(Value::Object(existing)) = base.get_mut(&key) {
                    deep_merge(existing, nested);
                    continue;
                }
                base.insert(key, Value::Object(nested));
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}
