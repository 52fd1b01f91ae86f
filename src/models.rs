// src/models.rs

use crate::constants::{ADMIN_CATEGORY, PLAYER_CATEGORY};
use crate::core::route::CommandRoute;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// --- `command_config.json` MODELS (What is read from and written to the config file) ---

/// The full persisted configuration document.
///
/// Every field carries a serde default, so a hand-edited file that omits whole
/// sections still loads; the missing parts are written back on the next save.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigDocument {
    /// Per-command settings keyed by normalized route-key (`group.leaf`).
    pub commands: BTreeMap<String, CommandSettings>,
    /// Palette used when formatting replies.
    pub colors: ColorSettings,
    /// Global switches.
    pub general: GeneralSettings,
}

/// Operator-editable settings for a single command.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandSettings {
    /// Display name; also resolves to the command.
    pub name: String,
    /// Primary short alias.
    pub shorthand: String,
    /// Help text shown to players.
    pub description: String,
    /// Disabled commands still resolve but are rejected at dispatch.
    pub enabled: bool,
    /// Restricts the command to admins on top of its declaration.
    pub admin_only: bool,
    /// Reply color override (`#rrggbb`), blank for the palette default.
    pub custom_color: String,
    /// Free-form listing category.
    pub category: String,
    /// Extra aliases.
    pub aliases: Vec<String>,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            shorthand: String::new(),
            description: String::new(),
            enabled: true,
            admin_only: false,
            custom_color: String::new(),
            category: String::new(),
            aliases: Vec::new(),
        }
    }
}

/// Reply palette, one `#rrggbb` value per [`ColorKind`](crate::core::color::ColorKind).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ColorSettings {
    /// Success replies.
    pub success: String,
    /// Error replies.
    pub error: String,
    /// Warnings.
    pub warning: String,
    /// Neutral information.
    pub info: String,
    /// Emphasized text.
    pub highlight: String,
    /// De-emphasized text.
    pub secondary: String,
    /// Accents.
    pub accent: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            success: "#00ff00".to_string(),
            error: "#ff0000".to_string(),
            warning: "#ffff00".to_string(),
            info: "#0000ff".to_string(),
            highlight: "#ffffff".to_string(),
            secondary: "#cccccc".to_string(),
            accent: "#ff8800".to_string(),
        }
    }
}

/// Global switches of the command subsystem.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralSettings {
    /// Wrap replies in `<color=...>` markup.
    pub enable_custom_colors: bool,
    /// When false, only canonical route strings resolve; names and aliases are ignored.
    pub enable_command_customization: bool,
    /// Gate for the hot-reload watcher.
    pub reload_config_on_change: bool,
    /// Prefix that marks a chat message as a command.
    pub command_prefix: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            enable_custom_colors: true,
            enable_command_customization: true,
            reload_config_on_change: true,
            command_prefix: ".".to_string(),
        }
    }
}

// --- DISCOVERY MODELS (never persisted) ---

/// The group a command was declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGroup {
    /// Group name as declared.
    pub name: String,
    /// Short form used in compound aliases.
    pub shorthand: Option<String>,
}

/// A command as declared by its handler module. Produced once by discovery and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    /// Normalized route.
    pub route: CommandRoute,
    /// The leaf name exactly as declared (case preserved, used for tokenizing).
    pub name: String,
    /// Enclosing group, if any.
    pub group: Option<CommandGroup>,
    /// Declared as admin-only.
    pub admin_only: bool,
    /// Declared help text.
    pub description: String,
    /// Declared preferred shorthand.
    pub shorthand: Option<String>,
    /// Argument synopsis.
    pub usage: String,
}

impl CommandDefinition {
    /// The category a fresh settings entry receives.
    pub fn default_category(&self) -> &'static str {
        if self.admin_only {
            ADMIN_CATEGORY
        } else {
            PLAYER_CATEGORY
        }
    }
}

// --- READ-FACING MODELS ---

/// Join of a definition, its settings and every alias that resolves to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// What was declared.
    pub definition: CommandDefinition,
    /// What the operator configured.
    pub settings: CommandSettings,
    /// Canonical route string first, then name, shorthand and extra aliases.
    pub aliases: Vec<String>,
}

impl CommandDescriptor {
    /// Joins `definition` and `settings`, collecting their distinct aliases.
    pub fn new(definition: CommandDefinition, settings: CommandSettings) -> Self {
        let candidates = std::iter::once(definition.route.to_command_string())
            .chain(std::iter::once(settings.name.clone()))
            .chain(std::iter::once(settings.shorthand.clone()))
            .chain(settings.aliases.iter().cloned());

        let mut seen = HashSet::new();
        let aliases = candidates
            .map(|alias| alias.trim().to_string())
            .filter(|alias| !alias.is_empty())
            .filter(|alias| seen.insert(alias.to_lowercase()))
            .collect();

        Self {
            definition,
            settings,
            aliases,
        }
    }

    /// The command's route.
    pub fn route(&self) -> &CommandRoute {
        &self.definition.route
    }

    /// Declared admin commands stay admin-only; the operator may restrict further but not relax.
    pub fn admin_only(&self) -> bool {
        self.definition.admin_only || self.settings.admin_only
    }

    /// Operator switch.
    pub fn enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Configured description, falling back to the declared one.
    pub fn description(&self) -> &str {
        if self.settings.description.trim().is_empty() {
            &self.definition.description
        } else {
            &self.settings.description
        }
    }

    /// Configured category, falling back to `admin`/`player`.
    pub fn category(&self) -> &str {
        if !self.settings.category.trim().is_empty() {
            &self.settings.category
        } else if self.admin_only() {
            ADMIN_CATEGORY
        } else {
            PLAYER_CATEGORY
        }
    }

    /// The canonical route string, used for sorting listings.
    pub fn primary_alias(&self) -> String {
        self.aliases
            .first()
            .cloned()
            .unwrap_or_else(|| self.definition.route.to_command_string())
    }

    /// Aliases other than the canonical form.
    pub fn extra_aliases(&self) -> &[String] {
        self.aliases.get(1..).unwrap_or(&[])
    }
}
