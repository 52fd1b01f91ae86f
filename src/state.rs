// src/state.rs

use crate::core::catalog::CommandCatalog;
use crate::core::color::{self, ColorKind};
use crate::core::config_store::{ConfigStore, LoadStatus, StoreError};
use crate::core::reconcile::{self, ReconcileReport};
use crate::core::resolver::{AliasIndex, Resolution};
use crate::core::route::CommandRoute;
use crate::models::{
    ColorSettings, CommandDescriptor, CommandSettings, ConfigDocument, GeneralSettings,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::SystemTime;
use thiserror::Error;

/// Failures surfaced by [`CommandRouter`] operations.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Reading, parsing or writing the config file failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Who a command listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Audience {
    /// Commands anyone may run.
    Player,
    /// Admin-only commands.
    Admin,
    /// Every command.
    All,
}

impl Audience {
    fn admits(self, descriptor: &CommandDescriptor) -> bool {
        match self {
            Audience::Player => !descriptor.admin_only(),
            Audience::Admin => descriptor.admin_only(),
            Audience::All => true,
        }
    }
}

/// Everything a reader needs, built from one consistent configuration.
///
/// Published behind an `Arc` and never mutated afterwards.
#[derive(Debug, Default)]
pub struct RouterSnapshot {
    /// Alias lookup table.
    pub index: AliasIndex,
    /// In catalog order.
    pub descriptors: Vec<CommandDescriptor>,
    /// Reply palette.
    pub colors: ColorSettings,
    /// Global switches.
    pub general: GeneralSettings,
    by_key: HashMap<String, usize>,
}

impl RouterSnapshot {
    fn build(catalog: &CommandCatalog, document: &ConfigDocument) -> Self {
        let descriptors: Vec<CommandDescriptor> = catalog
            .iter()
            .map(|definition| {
                let settings = document
                    .commands
                    .get(&definition.route.key())
                    .cloned()
                    .unwrap_or_default();
                CommandDescriptor::new(definition.clone(), settings)
            })
            .collect();

        let index = AliasIndex::build(
            &descriptors,
            document.general.enable_command_customization,
        );
        let by_key = descriptors
            .iter()
            .enumerate()
            .map(|(position, descriptor)| (descriptor.route().key(), position))
            .collect();

        Self {
            index,
            descriptors,
            colors: document.colors.clone(),
            general: document.general.clone(),
            by_key,
        }
    }

    /// Resolves `input` against this snapshot.
    pub fn resolve(&self, input: &str) -> Option<Resolution> {
        self.index.resolve(input)
    }

    /// Looks a command up by route-key, then by alias.
    pub fn descriptor(&self, command_or_alias: &str) -> Option<&CommandDescriptor> {
        if command_or_alias.trim().is_empty() {
            return None;
        }

        let key = CommandRoute::normalize_key(command_or_alias);
        if let Some(position) = self.by_key.get(&key) {
            return self.descriptors.get(*position);
        }

        if let Some(route) = self.index.route_for(command_or_alias) {
            return self
                .by_key
                .get(&route.key())
                .and_then(|position| self.descriptors.get(*position));
        }

        let wanted = command_or_alias.trim();
        self.descriptors.iter().find(|descriptor| {
            descriptor
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(wanted))
        })
    }

    /// Descriptors visible to `audience`, sorted by primary alias.
    pub fn descriptors_for(&self, audience: Audience) -> Vec<&CommandDescriptor> {
        let mut matching: Vec<&CommandDescriptor> = self
            .descriptors
            .iter()
            .filter(|descriptor| audience.admits(descriptor))
            .collect();
        matching.sort_by_key(|descriptor| descriptor.primary_alias());
        matching
    }

    /// Formats a reply with this snapshot's palette.
    pub fn format_message(&self, text: &str, kind: ColorKind) -> String {
        color::format_message(text, kind, &self.colors, &self.general)
    }

    /// Rewrites a chat message whose body is an alias into its canonical form.
    ///
    /// `None` when the message does not start with the command prefix. A prefixed
    /// message that matches no alias comes back with its body left-trimmed.
    pub fn preprocess_chat(&self, message: &str) -> Option<String> {
        let prefix = self.general.command_prefix.as_str();
        if prefix.is_empty() {
            return None;
        }
        let body = message.strip_prefix(prefix)?;
        Some(format!("{}{}", prefix, self.index.normalize_incoming(body)))
    }
}

/// Owns the config store and publishes immutable [`RouterSnapshot`]s.
///
/// Reads clone the current snapshot and never wait on a reload. Reloads and saves
/// are serialized on the store lock.
#[derive(Debug)]
pub struct CommandRouter {
    catalog: CommandCatalog,
    config_path: PathBuf,
    store: Mutex<ConfigStore>,
    snapshot: RwLock<Arc<RouterSnapshot>>,
}

impl CommandRouter {
    /// Loads the store, reconciles it against `catalog` and publishes the first snapshot.
    ///
    /// Never fails: a missing or unreadable file is replaced by a fresh default one.
    pub fn open(catalog: CommandCatalog, mut store: ConfigStore) -> Self {
        let status = store.load();
        let report = reconcile::reconcile(&mut store, &catalog);

        if !report.changed() && status != LoadStatus::Loaded {
            if let Err(e) = store.save() {
                log::error!("Failed to write default command configuration: {}", e);
            }
        }

        let snapshot = RouterSnapshot::build(&catalog, store.document());
        log::info!(
            "Command router ready: {} commands, {} aliases.",
            snapshot.descriptors.len(),
            snapshot.index.len()
        );

        Self {
            config_path: store.path().to_path_buf(),
            catalog,
            store: Mutex::new(store),
            snapshot: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The discovered commands.
    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// Path of the config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<RouterSnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn lock_store(&self) -> MutexGuard<'_, ConfigStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: RouterSnapshot) {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
    }

    /// Re-reads the file, reconciles and publishes a new snapshot.
    ///
    /// # Errors
    /// Returns the store error when the file cannot be read or parsed; the
    /// previous snapshot stays published.
    pub fn reload(&self) -> Result<ReconcileReport, RouterError> {
        let mut store = self.lock_store();

        if let Err(e) = store.reload() {
            log::error!("Command configuration reload failed, keeping the current one: {}", e);
            return Err(e.into());
        }

        let report = reconcile::reconcile(&mut store, &self.catalog);
        self.publish(RouterSnapshot::build(&self.catalog, store.document()));
        log::info!("Command configuration reloaded ({}).", report);
        Ok(report)
    }

    /// Persists the current document as is.
    pub fn save(&self) -> Result<(), RouterError> {
        self.lock_store().save()?;
        Ok(())
    }

    /// Whether a change notification observed at `now` came from our own save.
    pub fn is_self_induced_change(&self, now: SystemTime) -> bool {
        self.lock_store().is_self_induced(now)
    }

    /// Current `reloadConfigOnChange` value.
    pub fn reload_on_change_enabled(&self) -> bool {
        self.snapshot().general.reload_config_on_change
    }

    /// Resolves `input` against the published snapshot.
    pub fn resolve(&self, input: &str) -> Option<Resolution> {
        self.snapshot().resolve(input)
    }

    /// Canonical text for `input`, or the input itself when nothing matches.
    pub fn normalize_incoming(&self, input: &str) -> String {
        self.snapshot().index.normalize_incoming(input)
    }

    /// Rewrites a prefixed chat message to its canonical form. `None` without the prefix.
    pub fn preprocess_chat(&self, message: &str) -> Option<String> {
        self.snapshot().preprocess_chat(message)
    }

    /// Looks a command up by route-key, command string or alias.
    pub fn descriptor(&self, command_or_alias: &str) -> Option<CommandDescriptor> {
        self.snapshot().descriptor(command_or_alias).cloned()
    }

    /// Commands visible to `audience`, sorted by primary alias.
    pub fn descriptors_for(&self, audience: Audience) -> Vec<CommandDescriptor> {
        self.snapshot()
            .descriptors_for(audience)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Current settings of `route_key`.
    pub fn settings(&self, route_key: &str) -> Option<CommandSettings> {
        let snapshot = self.snapshot();
        let position = snapshot.by_key.get(&CommandRoute::normalize_key(route_key))?;
        snapshot
            .descriptors
            .get(*position)
            .map(|descriptor| descriptor.settings.clone())
    }

    /// The configured display name, or the canonical route string when unset.
    pub fn command_name(&self, route_key: &str) -> String {
        self.settings(route_key)
            .map(|settings| settings.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| CommandRoute::from_key(route_key).to_command_string())
    }

    /// Configured shorthand, if not blank.
    pub fn command_shorthand(&self, route_key: &str) -> Option<String> {
        self.settings(route_key)
            .map(|settings| settings.shorthand)
            .filter(|shorthand| !shorthand.trim().is_empty())
    }

    /// Unknown commands count as enabled.
    pub fn is_enabled(&self, route_key: &str) -> bool {
        self.settings(route_key)
            .map(|settings| settings.enabled)
            .unwrap_or(true)
    }

    /// Formats a reply with the published palette.
    pub fn format_message(&self, text: &str, kind: ColorKind) -> String {
        self.snapshot().format_message(text, kind)
    }
}
