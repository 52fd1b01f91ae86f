//! # Config Store
//!
//! Durable state for command settings, the color palette and general settings.
//!
//! The store owns the backing file path and the in-memory [`ConfigDocument`].
//! Two load flavours exist:
//!
//! - [`ConfigStore::load`] is used at startup and never fails: a missing file
//!   yields an empty document, a corrupt one is copied aside and also yields an
//!   empty document. Reconciliation then re-derives the defaults.
//! - [`ConfigStore::reload`] is used by hot reload and the operator reload
//!   action. It is strict: on any failure the current document is kept, so a bad
//!   edit never takes the live configuration down.

use crate::constants::{CORRUPT_BACKUP_SUFFIX, SELF_WRITE_WINDOW};
use crate::core::fingerprint::FileFingerprint;
use crate::core::route::CommandRoute;
use crate::models::{CommandSettings, ConfigDocument};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Errors raised by the strict store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A filesystem I/O error occurred.
    #[error("Filesystem error on '{path}': {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON or does not match the config schema.
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The in-memory document could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The file was read and parsed.
    Loaded,
    /// No file exists yet; the document is empty and should be saved after reconciliation.
    Missing,
    /// The file could not be used; the document is empty and the old file was kept aside.
    Recovered,
}

#[derive(Debug, Clone)]
struct SaveRecord {
    at: SystemTime,
    fingerprint: Option<FileFingerprint>,
}

/// Owner of the persisted configuration document.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    document: ConfigDocument,
    last_save: Option<SaveRecord>,
}

impl ConfigStore {
    /// Creates a store for `path` holding an empty document. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: ConfigDocument::default(),
            last_save: None,
        }
    }

    /// Path of the config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory document.
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Mutable access to the in-memory document.
    pub fn document_mut(&mut self) -> &mut ConfigDocument {
        &mut self.document
    }

    /// Startup load. Never fails; see [`LoadStatus`] for what happened.
    pub fn load(&mut self) -> LoadStatus {
        match self.read_document() {
            Ok(Some(document)) => {
                self.document = document;
                log::info!("Command configuration loaded from {}", self.path.display());
                LoadStatus::Loaded
            }
            Ok(None) => {
                log::info!(
                    "No command configuration at {}. A default one will be created.",
                    self.path.display()
                );
                self.document = ConfigDocument::default();
                LoadStatus::Missing
            }
            Err(e) => {
                log::error!("Failed to load command configuration: {}", e);
                if matches!(e, StoreError::Parse { .. }) {
                    self.backup_corrupt_file();
                }
                self.document = ConfigDocument::default();
                LoadStatus::Recovered
            }
        }
    }

    /// Strict load. On error the current document stays in place.
    ///
    /// A file that disappeared is not an error: the document is emptied and
    /// reconciliation recreates it.
    pub fn reload(&mut self) -> Result<LoadStatus, StoreError> {
        match self.read_document()? {
            Some(document) => {
                self.document = document;
                Ok(LoadStatus::Loaded)
            }
            None => {
                self.document = ConfigDocument::default();
                Ok(LoadStatus::Missing)
            }
        }
    }

    /// Serializes the document and overwrites the backing file.
    ///
    /// Records when the write happened so change notifications caused by it can be ignored.
    /// On failure the in-memory document remains authoritative.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let at = SystemTime::now();
        fs::write(&self.path, json).map_err(|source| self.io_error(source))?;
        self.last_save = Some(SaveRecord {
            at,
            fingerprint: FileFingerprint::of(&self.path).ok(),
        });

        log::info!("Command configuration saved to {}", self.path.display());
        Ok(())
    }

    /// Direct lookup by route-key. Aliases are not resolved here.
    pub fn get_settings(&self, route_key: &str) -> Option<&CommandSettings> {
        if route_key.trim().is_empty() {
            return None;
        }
        self.document
            .commands
            .get(&CommandRoute::normalize_key(route_key))
    }

    /// Whether a change notification observed at `now` was most likely caused by our own save.
    ///
    /// True inside the self-write window after a save, or when the file still holds
    /// exactly the bytes we last wrote.
    pub fn is_self_induced(&self, now: SystemTime) -> bool {
        let Some(record) = &self.last_save else {
            return false;
        };

        let within_window = now
            .duration_since(record.at)
            .map(|elapsed| elapsed <= SELF_WRITE_WINDOW)
            .unwrap_or(true);
        if within_window {
            return true;
        }

        match (&record.fingerprint, FileFingerprint::of(&self.path)) {
            (Some(saved), Ok(current)) => saved.same_content(&current),
            _ => false,
        }
    }

    /// When this store last wrote the file, if ever.
    pub fn last_save_time(&self) -> Option<SystemTime> {
        self.last_save.as_ref().map(|record| record.at)
    }

    fn read_document(&self) -> Result<Option<ConfigDocument>, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        let mut document: ConfigDocument =
            serde_json::from_str(&json).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        normalize_keys(&mut document);
        Ok(Some(document))
    }

    fn backup_corrupt_file(&self) {
        let mut backup = self.path.clone().into_os_string();
        backup.push(CORRUPT_BACKUP_SUFFIX);
        let backup = PathBuf::from(backup);

        match fs::copy(&self.path, &backup) {
            Ok(_) => log::warn!(
                "Unreadable configuration kept as {} before defaults are restored.",
                backup.display()
            ),
            Err(e) => log::error!(
                "Could not keep a copy of the unreadable configuration at {}: {}",
                backup.display(),
                e
            ),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Re-normalizes every route-key of `document` (trim, lower-case, dot-joined).
///
/// Blank keys are dropped. When two hand-written keys normalize to the same
/// route, the one that sorts last wins.
pub fn normalize_keys(document: &mut ConfigDocument) {
    let commands = std::mem::take(&mut document.commands);
    let mut normalized = BTreeMap::new();
    for (key, settings) in commands {
        let normalized_key = CommandRoute::normalize_key(&key);
        if normalized_key.is_empty() {
            log::warn!("Dropping command settings with a blank key.");
            continue;
        }
        if normalized_key != key {
            log::debug!("Normalized command key '{}' -> '{}'", key, normalized_key);
        }
        normalized.insert(normalized_key, settings);
    }
    document.commands = normalized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("nested").join("command_config.json"))
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert_eq!(store.load(), LoadStatus::Missing);
        assert!(store.document().commands.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.document_mut().commands.insert(
            "arena.start".to_string(),
            CommandSettings {
                name: "arena start".to_string(),
                shorthand: "st".to_string(),
                aliases: vec!["arn s".to_string(), "go".to_string()],
                enabled: false,
                ..Default::default()
            },
        );
        store.document_mut().general.command_prefix = "!".to_string();
        store.document_mut().colors.accent = "#123456".to_string();
        store.save().unwrap();

        let mut reloaded = ConfigStore::new(store.path());
        assert_eq!(reloaded.load(), LoadStatus::Loaded);
        assert_eq!(reloaded.document(), store.document());
    }

    #[test]
    fn test_round_trip_normalizes_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store
            .document_mut()
            .commands
            .insert(" Arena.START ".to_string(), CommandSettings::default());
        store.save().unwrap();

        let mut reloaded = ConfigStore::new(store.path());
        reloaded.load();
        let keys: Vec<_> = reloaded.document().commands.keys().cloned().collect();
        assert_eq!(keys, vec!["arena.start"]);
    }

    #[test]
    fn test_hand_edited_keys_are_normalized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("command_config.json");
        fs::write(
            &path,
            r#"{ "commands": { "Config Reload": { "shorthand": "rl" }, "  ": {} } }"#,
        )
        .unwrap();

        let mut store = ConfigStore::new(&path);
        assert_eq!(store.load(), LoadStatus::Loaded);
        assert_eq!(store.document().commands.len(), 1);
        assert_eq!(store.get_settings("CONFIG.reload").unwrap().shorthand, "rl");
        assert!(store.get_settings("").is_none());
    }

    #[test]
    fn test_corrupt_file_recovers_and_keeps_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("command_config.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = ConfigStore::new(&path);
        assert_eq!(store.load(), LoadStatus::Recovered);
        assert!(store.document().commands.is_empty());

        let backup = dir.path().join("command_config.json.corrupt");
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ not json");
        assert!(path.exists());
    }

    #[test]
    fn test_strict_reload_keeps_document_on_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("command_config.json");
        fs::write(&path, r#"{ "commands": { "fly": { "shorthand": "^" } } }"#).unwrap();

        let mut store = ConfigStore::new(&path);
        store.load();
        fs::write(&path, r#"{ "commands": { "fly": "#).unwrap();

        let result = store.reload();
        assert!(matches!(result, Err(StoreError::Parse { .. })));
        assert_eq!(store.get_settings("fly").unwrap().shorthand, "^");
    }

    #[test]
    fn test_self_induced_detection() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(!store.is_self_induced(SystemTime::now()));

        store.save().unwrap();
        let saved_at = store.last_save_time().unwrap();
        assert!(store.is_self_induced(saved_at + Duration::from_millis(100)));

        // Past the window, identical bytes still count as our own write.
        let later = saved_at + Duration::from_secs(5);
        assert!(store.is_self_induced(later));

        fs::write(store.path(), r#"{ "general": { "commandPrefix": "!" } }"#).unwrap();
        assert!(!store.is_self_induced(later));
    }
}
