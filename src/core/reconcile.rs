//! # Reconciliation
//!
//! Keeps the persisted [`ConfigDocument`] consistent with the discovered
//! [`CommandCatalog`]:
//!
//! 1. Missing commands get a settings entry, with blank fields filled from the declaration.
//! 2. Entries without a shorthand or extra alias get generated ones, unique across all
//!    commands and never equal to another command's canonical form or display name.
//! 3. Entries whose route no longer exists are pruned (renamed or removed commands).
//! 4. If anything changed, the document is persisted.
//!
//! Reconciliation never fails towards its caller. A save failure is logged and the
//! in-memory document stays authoritative until the next successful save.

use crate::core::alias_generator::{self, UsedAliases};
use crate::core::catalog::CommandCatalog;
use crate::core::config_store::ConfigStore;
use crate::models::{CommandDefinition, CommandSettings, ConfigDocument};
use std::collections::HashSet;
use std::fmt;

/// What a reconciliation pass did, by route-key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Commands that got a new settings entry.
    pub added: Vec<String>,
    /// Existing entries that had blank fields filled or aliases generated.
    pub updated: Vec<String>,
    /// Entries dropped because no discovered command matches them.
    pub removed: Vec<String>,
}

impl ReconcileReport {
    /// True if the pass touched anything.
    pub fn changed(&self) -> bool {
        !(self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty())
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} updated, {} removed",
            self.added.len(),
            self.updated.len(),
            self.removed.len()
        )
    }
}

/// Fills blank fields of `settings` from the declaration. Returns true if anything was written.
fn fill_from_declaration(settings: &mut CommandSettings, definition: &CommandDefinition) -> bool {
    let mut changed = false;

    if settings.name.trim().is_empty() {
        settings.name = definition.route.to_command_string();
        changed = true;
    }
    if settings.category.trim().is_empty() {
        settings.category = definition.default_category().to_string();
        changed = true;
    }
    if settings.description.trim().is_empty() && !definition.description.is_empty() {
        settings.description = definition.description.clone();
        changed = true;
    }

    let before = settings.aliases.len();
    settings.aliases.retain(|alias| !alias.trim().is_empty());
    if settings.aliases.len() != before {
        changed = true;
    }

    changed
}

/// Brings `document` in line with `catalog`. Pure: nothing is written to disk.
pub fn reconcile_document(
    document: &mut ConfigDocument,
    catalog: &CommandCatalog,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    let mut used = UsedAliases::from_document(document);
    for definition in catalog {
        used.reserve(&definition.route.to_command_string(), &definition.route.key());
    }

    for definition in catalog {
        let key = definition.route.key();

        let created = !document.commands.contains_key(&key);
        let settings = document.commands.entry(key.clone()).or_insert_with(|| CommandSettings {
            admin_only: definition.admin_only,
            ..Default::default()
        });

        let mut changed = fill_from_declaration(settings, definition);

        if settings.shorthand.trim().is_empty() {
            match alias_generator::generate_short(definition, &mut used) {
                Some(shorthand) => {
                    log::debug!("Generated shorthand '{}' for '{}'", shorthand, key);
                    settings.shorthand = shorthand;
                    changed = true;
                }
                None => log::warn!("Could not generate a shorthand for '{}'", key),
            }
        }

        if settings.aliases.is_empty() {
            let compound =
                alias_generator::generate_compound(definition, &settings.shorthand, &mut used);
            if let Some(alias) = compound {
                log::debug!("Generated alias '{}' for '{}'", alias, key);
                settings.aliases.push(alias);
                changed = true;
            }
        }

        if created {
            report.added.push(key);
        } else if changed {
            report.updated.push(key);
        }
    }

    let valid: HashSet<String> = catalog.iter().map(|d| d.route.key()).collect();
    let stale: Vec<String> = document
        .commands
        .keys()
        .filter(|key| !valid.contains(*key))
        .cloned()
        .collect();
    for key in stale {
        log::info!("Removing settings for unknown command '{}'", key);
        document.commands.remove(&key);
        report.removed.push(key);
    }

    report
}

/// Reconciles the store's document and persists it when something changed.
pub fn reconcile(store: &mut ConfigStore, catalog: &CommandCatalog) -> ReconcileReport {
    let report = reconcile_document(store.document_mut(), catalog);

    if report.changed() {
        log::info!("Command configuration reconciled: {}", report);
        if let Err(e) = store.save() {
            log::error!("Failed to save reconciled command configuration: {}", e);
        }
    } else {
        log::debug!("Command configuration already consistent with the catalog.");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{CommandDeclaration, CommandRegistry};
    use crate::core::resolver::{AliasIndex, normalize_alias};
    use crate::models::CommandDescriptor;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn catalog(declarations: Vec<CommandDeclaration>) -> CommandCatalog {
        let mut registry = CommandRegistry::new();
        for declaration in declarations {
            registry.register(declaration);
        }
        CommandCatalog::discover(&registry)
    }

    fn sample_catalog() -> CommandCatalog {
        catalog(vec![
            CommandDeclaration::new("start")
                .in_group("arena", Some("arn"))
                .shorthand("st")
                .description("Start an arena match.")
                .admin_only(true),
            CommandDeclaration::new("status")
                .in_group("example", Some("ex"))
                .shorthand("st"),
            CommandDeclaration::new("teleportHorse").admin_only(true),
            CommandDeclaration::new("ping").description("Show your latency."),
        ])
    }

    #[test]
    fn test_fresh_document_is_populated() {
        let mut document = ConfigDocument::default();
        let report = reconcile_document(&mut document, &sample_catalog());

        assert_eq!(report.added.len(), 4);
        assert!(report.changed());

        let start = document.commands.get("arena.start").unwrap();
        assert_eq!(start.name, "arena start");
        assert_eq!(start.shorthand, "st");
        assert_eq!(start.aliases, vec!["arn s"]);
        assert_eq!(start.category, "admin");
        assert!(start.admin_only);
        assert!(start.enabled);
        assert_eq!(start.description, "Start an arena match.");

        // Same declared shorthand in another group gets a suffix.
        let status = document.commands.get("example.status").unwrap();
        assert_eq!(status.shorthand, "st2");
        assert_eq!(status.aliases, vec!["ex s"]);
        assert_eq!(status.category, "player");

        let horse = document.commands.get("teleporthorse").unwrap();
        assert_eq!(horse.shorthand, "tphorse");
        assert!(horse.aliases.is_empty());
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let catalog = sample_catalog();
        let mut document = ConfigDocument::default();
        reconcile_document(&mut document, &catalog);
        let snapshot = document.clone();

        let report = reconcile_document(&mut document, &catalog);
        assert!(!report.changed());
        assert_eq!(document, snapshot);
    }

    #[test]
    fn test_operator_edits_are_preserved() {
        let catalog = sample_catalog();
        let mut document = ConfigDocument::default();
        document.commands.insert(
            "ping".to_string(),
            CommandSettings {
                name: "latency".to_string(),
                shorthand: "lat".to_string(),
                aliases: vec!["pong".to_string()],
                enabled: false,
                category: "fun".to_string(),
                description: "Custom".to_string(),
                ..Default::default()
            },
        );

        let report = reconcile_document(&mut document, &catalog);
        assert!(!report.updated.contains(&"ping".to_string()));

        let ping = document.commands.get("ping").unwrap();
        assert_eq!(ping.name, "latency");
        assert_eq!(ping.shorthand, "lat");
        assert_eq!(ping.aliases, vec!["pong"]);
        assert!(!ping.enabled);
        assert_eq!(ping.category, "fun");
    }

    #[test]
    fn test_empty_existing_entry_is_filled() {
        let mut document = ConfigDocument::default();
        document
            .commands
            .insert("ping".to_string(), CommandSettings::default());
        document.commands.get_mut("ping").unwrap().aliases = vec!["  ".to_string()];

        let report = reconcile_document(&mut document, &sample_catalog());
        assert_eq!(report.updated, vec!["ping"]);

        let ping = document.commands.get("ping").unwrap();
        assert_eq!(ping.name, "ping");
        assert_eq!(ping.shorthand, "ping");
        assert_eq!(ping.description, "Show your latency.");
        // Ungrouped: no compound alias, and the blank one is gone.
        assert!(ping.aliases.is_empty());
    }

    #[test]
    fn test_stale_entries_are_removed_and_persisted() {
        let dir = TempDir::new().unwrap();
        let mut store = ConfigStore::new(dir.path().join("command_config.json"));
        store
            .document_mut()
            .commands
            .insert("old.command".to_string(), CommandSettings::default());

        let report = reconcile(&mut store, &sample_catalog());
        assert_eq!(report.removed, vec!["old.command"]);

        let mut reloaded = ConfigStore::new(store.path());
        reloaded.load();
        assert!(reloaded.get_settings("old.command").is_none());
        assert!(reloaded.get_settings("arena.start").is_some());
    }

    #[test]
    fn test_unchanged_document_is_not_saved() {
        let dir = TempDir::new().unwrap();
        let catalog = sample_catalog();
        let mut store = ConfigStore::new(dir.path().join("command_config.json"));
        reconcile(&mut store, &catalog);
        let first_save = store.last_save_time();
        assert!(first_save.is_some());

        let report = reconcile(&mut store, &catalog);
        assert!(!report.changed());
        assert_eq!(store.last_save_time(), first_save);
    }

    #[test]
    fn test_aliases_unique_across_colliding_catalog() {
        let leaves = ["Fly", "FlyUp", "FlyDown", "FlyHigh", "Flyer"];
        let groups = [None, Some(("air", Some("a"))), Some(("sky", None))];
        let mut declarations = Vec::new();
        for i in 0..8 {
            for (g, group) in groups.iter().enumerate() {
                for leaf in leaves {
                    let name = if i == 0 { leaf.to_string() } else { format!("{}{}", leaf, i) };
                    let mut declaration = CommandDeclaration::new(name);
                    if let Some((group_name, shorthand)) = group {
                        declaration = declaration.in_group(format!("{}{}", group_name, g), *shorthand);
                    }
                    declarations.push(declaration);
                }
            }
        }
        let catalog = catalog(declarations);
        assert!(catalog.len() >= 100);

        let mut document = ConfigDocument::default();
        reconcile_document(&mut document, &catalog);

        let mut owners: HashMap<String, String> = HashMap::new();
        for (key, settings) in &document.commands {
            let generated = std::iter::once(&settings.shorthand).chain(settings.aliases.iter());
            for alias in generated {
                let previous = owners.insert(alias.to_lowercase(), key.clone());
                assert!(previous.is_none(), "alias '{}' assigned twice", alias);
            }
        }

        // Canonical forms and names count too: no text may belong to two commands.
        let descriptors: Vec<CommandDescriptor> = catalog
            .iter()
            .map(|definition| {
                let settings = document.commands.get(&definition.route.key()).unwrap();
                CommandDescriptor::new(definition.clone(), settings.clone())
            })
            .collect();
        let mut routes: HashMap<String, String> = HashMap::new();
        for descriptor in &descriptors {
            let key = descriptor.route().key();
            for alias in &descriptor.aliases {
                if let Some(other) = routes.insert(normalize_alias(alias), key.clone()) {
                    assert_eq!(other, key, "alias '{}' belongs to two commands", alias);
                }
            }
        }

        let index = AliasIndex::build(&descriptors, true);
        for descriptor in &descriptors {
            let canonical = descriptor.route().to_command_string();
            let resolution = index.resolve(&format!("{} 10", canonical)).unwrap();
            assert_eq!(&resolution.route, descriptor.route(), "'{}' resolved elsewhere", canonical);
            assert_eq!(resolution.remainder, "10");
        }
    }

    #[test]
    fn test_generated_shorthand_never_takes_a_canonical_form() {
        let catalog = catalog(vec![CommandDeclaration::new("Fly"), CommandDeclaration::new("FlyUp")]);
        let mut document = ConfigDocument::default();
        reconcile_document(&mut document, &catalog);

        assert_eq!(document.commands.get("fly").unwrap().shorthand, "^");
        assert_eq!(document.commands.get("flyup").unwrap().shorthand, "fly2");
    }

    #[test]
    fn test_generated_shorthand_avoids_display_names() {
        let mut document = ConfigDocument::default();
        document.commands.insert(
            "ping".to_string(),
            CommandSettings {
                name: "GAI".to_string(),
                shorthand: "p".to_string(),
                ..Default::default()
            },
        );
        let catalog = catalog(vec![
            CommandDeclaration::new("ping"),
            CommandDeclaration::new("giveAllItems"),
        ]);
        reconcile_document(&mut document, &catalog);

        assert_eq!(document.commands.get("ping").unwrap().name, "GAI");
        assert_eq!(document.commands.get("giveallitems").unwrap().shorthand, "gai2");
    }

    #[test]
    fn test_existing_aliases_are_stable_when_a_command_is_added() {
        let mut declarations = vec![
            CommandDeclaration::new("fly").in_group("move", None),
            CommandDeclaration::new("flyUp").in_group("move", None),
            CommandDeclaration::new("flood"),
        ];
        let mut document = ConfigDocument::default();
        reconcile_document(&mut document, &catalog(declarations.clone()));
        let before = document.clone();

        // The newcomer is declared first, so it would have taken these aliases on a fresh run.
        declarations.insert(0, CommandDeclaration::new("fly").in_group("air", Some("move")));
        let report = reconcile_document(&mut document, &catalog(declarations));
        assert_eq!(report.added, vec!["air.fly"]);

        for (key, settings) in &before.commands {
            let after = document.commands.get(key).unwrap();
            assert_eq!(after.shorthand, settings.shorthand);
            assert_eq!(after.aliases, settings.aliases);
        }

        let newcomer = document.commands.get("air.fly").unwrap();
        assert_eq!(newcomer.shorthand, "fly3");
        assert_eq!(newcomer.aliases, vec!["move f2"]);
    }
}
