// src/core/paths.rs

use crate::constants::{APP_DIR, CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

lazy_static! {
    static ref APP_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors raised while locating or expanding config paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The config directory could not be created.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        /// Directory that was being created.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// `~` or an environment variable could not be expanded.
    #[error("Failed to expand path '{path}': {reason}")]
    Expansion {
        /// The path as given.
        path: String,
        /// What the expander reported.
        reason: String,
    },
    /// The working directory is unavailable.
    #[error("Could not determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Returns the application configuration directory (`~/.config/cmdalias` on Linux).
/// Creates it if it doesn't exist.
///
/// Memoized: only the first call touches the filesystem.
pub fn default_config_dir() -> Result<PathBuf, PathError> {
    let mut cached = APP_CONFIG_DIR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_DIR);

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached = Some(config_path.clone());
    Ok(config_path)
}

/// The default `command_config.json` location.
pub fn default_config_path() -> Result<PathBuf, PathError> {
    default_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Expands `~` and environment variables, anchors relative paths at the current
/// directory and strips Windows verbatim prefixes.
pub fn expand_path(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw.trim()).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;

    let path = PathBuf::from(expanded.into_owned());
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(PathError::CurrentDir)?
            .join(path)
    };
    Ok(dunce::simplified(&absolute).to_path_buf())
}

/// The config file to use: the user-supplied one when given, otherwise the default.
///
/// A user-supplied directory gets the default file name appended.
pub fn resolve_config_path(user_path: Option<&str>) -> Result<PathBuf, PathError> {
    match user_path {
        Some(raw) => {
            let path = expand_path(raw)?;
            Ok(with_default_file_name(&path))
        }
        None => default_config_path(),
    }
}

fn with_default_file_name(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILENAME)
    } else {
        path.to_path_buf()
    }
}
