// src/core/json_io.rs

//! Whole-document JSON reads and writes. There is no partial update: every
//! save serializes the full structure and atomically replaces the file.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Failures reading or writing a JSON document.
#[derive(Error, Debug)]
pub enum JsonError {
    /// The file is missing.
    #[error("File '{0}' does not exist.")]
    NotFound(PathBuf),
    #[error("Failed to read '{path}': {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in '{path}': {source}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write '{path}': {source}")]
    Write {
        /// Destination of the write.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The data could not be turned into JSON.
    #[error("Failed to serialize to JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and parses a JSON document.
pub fn load_json(path: &Path) -> Result<Value, JsonError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            JsonError::NotFound(path.to_path_buf())
        } else {
            JsonError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|e| JsonError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Reads a JSON object, degrading to an empty object when the file is
/// missing, unreadable, malformed or not an object. Never fails.
pub fn load_object_or_empty(path: &Path) -> serde_json::Map<String, Value> {
    match load_json(path) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            log::error!(
                "Expected a JSON object in '{}', found {}. Using an empty one.",
                path.display(),
                json_type_name(&other)
            );
            serde_json::Map::new()
        }
        Err(JsonError::NotFound(_)) => {
            log::warn!("JSON file not found: {}", path.display());
            serde_json::Map::new()
        }
        Err(e) => {
            log::error!("{}", e);
            serde_json::Map::new()
        }
    }
}

/// Serializes `data` pretty-printed and swaps it into place through a temp
/// file in the same directory, so a failed write leaves the old file intact.
pub fn save_json<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<(), JsonError> {
    let mut content = serde_json::to_string_pretty(data)?;
    content.push('\n');

    let write_err = |source: std::io::Error| JsonError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(write_err)?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(write_err)?;
    temp.write_all(content.as_bytes()).map_err(write_err)?;
    temp.flush().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Human name of a JSON value's type, for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
