//! # Command Catalog
//!
//! Discovery of the authoritative command set. Handler modules do not get
//! inspected at runtime; instead every command is *declared* in a
//! [`CommandRegistry`], either explicitly at process init or through the
//! `commands.toml` manifest that `build.rs` compiles into a static table.
//!
//! [`CommandCatalog::discover`] validates the declarations and produces the
//! ordered, immutable list of [`CommandDefinition`] values the rest of the
//! crate works from. A malformed declaration never blocks the others: it is
//! skipped and reported through the logger.

use crate::core::route::CommandRoute;
use crate::models::{CommandDefinition, CommandGroup};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading declarations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The manifest file could not be read.
    #[error("Could not read command manifest '{path}': {source}")]
    ManifestIo {
        /// Path of the manifest.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The manifest is not valid TOML or does not match the schema.
    #[error("Invalid command manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),
    /// A single declaration is unusable. Discovery logs and skips these.
    #[error("Malformed declaration '{declaration}': {reason}")]
    MalformedDeclaration {
        /// Human readable identification of the declaration.
        declaration: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// A single command declaration as written by a handler module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandDeclaration {
    /// Enclosing group, if any.
    pub group: Option<CommandGroup>,
    /// Leaf name as written.
    pub name: String,
    /// Preferred shorthand.
    pub shorthand: Option<String>,
    /// Help text.
    pub description: String,
    /// Restricted to admins.
    pub admin_only: bool,
    /// Argument synopsis.
    pub usage: String,
}

impl CommandDeclaration {
    /// Declares an ungrouped command named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Places the command in group `name`.
    pub fn in_group(mut self, name: impl Into<String>, shorthand: Option<&str>) -> Self {
        self.group = Some(CommandGroup {
            name: name.into(),
            shorthand: shorthand.map(str::to_string),
        });
        self
    }

    /// Sets the preferred shorthand.
    pub fn shorthand(mut self, shorthand: impl Into<String>) -> Self {
        self.shorthand = Some(shorthand.into());
        self
    }

    /// Sets the help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the command as admin-only.
    pub fn admin_only(mut self, admin_only: bool) -> Self {
        self.admin_only = admin_only;
        self
    }

    /// Sets the argument synopsis.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    fn label(&self) -> String {
        match &self.group {
            Some(group) => format!("{} {}", group.name, self.name),
            None => self.name.clone(),
        }
    }

    /// Checks the declaration and builds its definition.
    fn to_definition(&self) -> Result<CommandDefinition, CatalogError> {
        let malformed = |reason| CatalogError::MalformedDeclaration {
            declaration: self.label(),
            reason,
        };

        let name = self.name.trim();
        if name.is_empty() {
            return Err(malformed("command name is empty"));
        }
        if name.contains(|c: char| c.is_whitespace() || c == '.') {
            return Err(malformed("command name contains whitespace or '.'"));
        }

        let group = match &self.group {
            Some(group) => {
                let group_name = group.name.trim();
                if group_name.is_empty() {
                    return Err(malformed("group name is empty"));
                }
                if group_name.contains(|c: char| c.is_whitespace() || c == '.') {
                    return Err(malformed("group name contains whitespace or '.'"));
                }
                Some(CommandGroup {
                    name: group_name.to_string(),
                    shorthand: non_blank(group.shorthand.as_deref()),
                })
            }
            None => None,
        };

        let route = match &group {
            Some(group) => CommandRoute::new([group.name.as_str(), name]),
            None => CommandRoute::new([name]),
        };

        Ok(CommandDefinition {
            route,
            name: name.to_string(),
            group,
            admin_only: self.admin_only,
            description: self.description.trim().to_string(),
            shorthand: non_blank(self.shorthand.as_deref()),
            usage: self.usage.trim().to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Declaration compiled in from `commands.toml`.
#[derive(Debug, Clone, Copy)]
struct StaticDeclaration {
    group: Option<&'static str>,
    group_shorthand: Option<&'static str>,
    name: &'static str,
    shorthand: Option<&'static str>,
    description: &'static str,
    admin_only: bool,
    usage: &'static str,
}

static BUILTIN_DECLARATIONS: &[StaticDeclaration] =
    include!(concat!(env!("OUT_DIR"), "/declared_commands.rs"));

impl From<&StaticDeclaration> for CommandDeclaration {
    fn from(decl: &StaticDeclaration) -> Self {
        Self {
            group: decl.group.map(|name| CommandGroup {
                name: name.to_string(),
                shorthand: decl.group_shorthand.map(str::to_string),
            }),
            name: decl.name.to_string(),
            shorthand: decl.shorthand.map(str::to_string),
            description: decl.description.to_string(),
            admin_only: decl.admin_only,
            usage: decl.usage.to_string(),
        }
    }
}

// --- Manifest schema (shared with build.rs) ---

#[derive(Deserialize, Debug, Default)]
struct Manifest {
    #[serde(default)]
    group: Vec<ManifestGroup>,
    #[serde(default)]
    command: Vec<ManifestCommand>,
}

#[derive(Deserialize, Debug)]
struct ManifestGroup {
    name: String,
    shorthand: Option<String>,
    #[serde(default)]
    command: Vec<ManifestCommand>,
}

#[derive(Deserialize, Debug)]
struct ManifestCommand {
    name: String,
    shorthand: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    admin_only: bool,
    #[serde(default)]
    usage: String,
}

impl ManifestCommand {
    fn into_declaration(self, group: Option<&ManifestGroup>) -> CommandDeclaration {
        CommandDeclaration {
            group: group.map(|g| CommandGroup {
                name: g.name.clone(),
                shorthand: g.shorthand.clone(),
            }),
            name: self.name,
            shorthand: self.shorthand,
            description: self.description,
            admin_only: self.admin_only,
            usage: self.usage,
        }
    }
}

/// The set of declarations handler modules registered at init.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    declarations: Vec<CommandDeclaration>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands compiled in from `commands.toml`.
    pub fn builtin() -> Self {
        Self {
            declarations: BUILTIN_DECLARATIONS.iter().map(CommandDeclaration::from).collect(),
        }
    }

    /// Parses a manifest with the same schema as `commands.toml`.
    pub fn from_manifest_str(content: &str) -> Result<Self, CatalogError> {
        let manifest: Manifest = toml::from_str(content)?;
        let mut registry = Self::new();
        for mut group in manifest.group {
            let commands = std::mem::take(&mut group.command);
            for command in commands {
                registry.register(command.into_declaration(Some(&group)));
            }
        }
        for command in manifest.command {
            registry.register(command.into_declaration(None));
        }
        Ok(registry)
    }

    /// Reads and parses the manifest at `path`.
    pub fn from_manifest_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::ManifestIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_manifest_str(&content)
    }

    /// Appends `declaration`.
    pub fn register(&mut self, declaration: CommandDeclaration) -> &mut Self {
        self.declarations.push(declaration);
        self
    }

    /// Declarations in registration order.
    pub fn declarations(&self) -> &[CommandDeclaration] {
        &self.declarations
    }
}

/// The immutable, ordered list of discovered commands.
#[derive(Debug, Clone, Default)]
pub struct CommandCatalog {
    definitions: Vec<CommandDefinition>,
    by_key: HashMap<String, usize>,
}

impl CommandCatalog {
    /// Validates every declaration of `registry` in order.
    ///
    /// Malformed declarations and duplicate routes are skipped with a warning;
    /// the first declaration of a route wins.
    pub fn discover(registry: &CommandRegistry) -> Self {
        let mut catalog = Self::default();

        for declaration in registry.declarations() {
            let definition = match declaration.to_definition() {
                Ok(definition) => definition,
                Err(e) => {
                    log::warn!("Skipping command declaration: {}", e);
                    continue;
                }
            };

            let key = definition.route.key();
            if catalog.by_key.contains_key(&key) {
                log::warn!(
                    "Skipping duplicate declaration of command '{}'.",
                    definition.route
                );
                continue;
            }

            catalog.by_key.insert(key, catalog.definitions.len());
            catalog.definitions.push(definition);
        }

        log::debug!("Discovered {} commands.", catalog.definitions.len());
        catalog
    }

    /// Definition for a normalized route-key.
    pub fn get(&self, route_key: &str) -> Option<&CommandDefinition> {
        let key = CommandRoute::normalize_key(route_key);
        self.by_key
            .get(&key)
            .and_then(|&position| self.definitions.get(position))
    }

    /// True if `route_key` was discovered.
    pub fn contains(&self, route_key: &str) -> bool {
        self.get(route_key).is_some()
    }

    /// Definitions in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CommandDefinition> {
        self.definitions.iter()
    }

    /// Number of discovered commands.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True if nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<'a> IntoIterator for &'a CommandCatalog {
    type Item = &'a CommandDefinition;
    type IntoIter = std::slice::Iter<'a, CommandDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
