// src/core/paths.rs

use crate::constants::{APP_DIR_NAME, CONFIG_FILENAMES, TEMPLATE_DIR_ENV, TEMPLATE_DIR_NAME};
use crate::core::json_io;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not locate the template config directory: {0}")]
    TemplateDirNotFound(String),
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves where configuration lives. The store asks once, at construction.
pub trait PathProvider: Debug + Send + Sync {
    /// The writable directory the running instance loads and mutates.
    fn user_config_dir(&self) -> Result<PathBuf, PathError>;

    /// The read-only directory holding factory defaults.
    fn template_config_dir(&self) -> Result<PathBuf, PathError>;
}

/// Platform locations: `<config dir>/Assistant` for user data and either
/// `$ASSISTANT_TEMPLATE_DIR` or `<exe dir>/config` for templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppPaths;

impl PathProvider for AppPaths {
    fn user_config_dir(&self) -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    fn template_config_dir(&self) -> Result<PathBuf, PathError> {
        if let Ok(dir) = std::env::var(TEMPLATE_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        let exe = std::env::current_exe()
            .map_err(|e| PathError::TemplateDirNotFound(e.to_string()))?;
        exe.parent()
            .map(|dir| dir.join(TEMPLATE_DIR_NAME))
            .ok_or_else(|| {
                PathError::TemplateDirNotFound(format!(
                    "executable '{}' has no parent directory",
                    exe.display()
                ))
            })
    }
}

/// Explicitly pinned directories, for tests and embedders.
#[derive(Debug, Clone)]
pub struct FixedPaths {
    pub user_dir: PathBuf,
    pub template_dir: PathBuf,
}

impl FixedPaths {
    pub fn new(user_dir: impl Into<PathBuf>, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            user_dir: user_dir.into(),
            template_dir: template_dir.into(),
        }
    }
}

impl PathProvider for FixedPaths {
    fn user_config_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.user_dir.clone())
    }

    fn template_config_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.template_dir.clone())
    }
}

/// Creates `dir` (and parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<(), PathError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| PathError::ConfigDirCreation {
            path: dir.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

/// First-run bootstrap: every config file missing from `user_dir` is copied
/// from `template_dir`, or written as an empty JSON object when the template
/// is missing too. Existing user files are never touched.
///
/// Individual copy failures are logged and skipped; the store then loads
/// whatever is there and degrades to empty structures.
pub fn ensure_user_config_files(user_dir: &Path, template_dir: &Path) -> Result<(), PathError> {
    ensure_dir(user_dir)?;

    for filename in CONFIG_FILENAMES {
        let user_path = user_dir.join(filename);
        if user_path.exists() {
            continue;
        }

        let template_path = template_dir.join(filename);
        if template_path.exists() {
            match fs::copy(&template_path, &user_path) {
                Ok(_) => log::info!("Copied template {} to user config directory.", filename),
                Err(e) => log::error!("Failed to copy template {}: {}", filename, e),
            }
        } else {
            log::warn!("Template file not found: {}", template_path.display());
            match json_io::save_json(&serde_json::json!({}), &user_path) {
                Ok(()) => log::info!("Created empty {} in user config directory.", filename),
                Err(e) => log::error!("Failed to create empty {}: {}", filename, e),
            }
        }
    }
    Ok(())
}
