//! # Alias Resolver
//!
//! Maps raw input text to a canonical command invocation.
//!
//! An [`AliasIndex`] is built once from the command descriptors and never
//! modified afterwards; a reload builds a new one. Lookup walks the aliases
//! from longest to shortest, so `tphorse target` resolves to the `tphorse`
//! command even when `tp` is also an alias.

use crate::core::route::CommandRoute;
use crate::models::CommandDescriptor;
use std::collections::HashMap;

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The command the alias points to.
    pub route: CommandRoute,
    /// The alias that matched, normalized.
    pub alias: String,
    /// Argument text after the alias, trimmed.
    pub remainder: String,
}

impl Resolution {
    /// `<route command string>[ <remainder>]`, for parsers that expect canonical names.
    pub fn canonical(&self) -> String {
        let command = self.route.to_command_string();
        if self.remainder.is_empty() {
            command
        } else {
            format!("{} {}", command, self.remainder)
        }
    }
}

/// Immutable alias -> route lookup table.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    routes: HashMap<String, CommandRoute>,
    /// Keys of `routes`, longest first.
    ordered: Vec<String>,
}

/// Trims, lower-cases and collapses inner whitespace.
pub fn normalize_alias(alias: &str) -> String {
    alias
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl AliasIndex {
    /// Builds the index from `descriptors`.
    ///
    /// Every alias of every descriptor is registered; on an exact collision the
    /// last registration wins. Canonical route strings are registered after all
    /// other aliases, so a configured alias never shadows another command's
    /// canonical form. With `customization_enabled` off, only canonical route
    /// strings are registered.
    pub fn build<'a, I>(descriptors: I, customization_enabled: bool) -> Self
    where
        I: IntoIterator<Item = &'a CommandDescriptor>,
    {
        let descriptors: Vec<&CommandDescriptor> = descriptors.into_iter().collect();
        let mut index = Self::default();

        if customization_enabled {
            for descriptor in &descriptors {
                for alias in descriptor.extra_aliases() {
                    index.register(alias, descriptor.route());
                }
            }
        }
        for descriptor in &descriptors {
            let route = descriptor.route();
            index.register(&route.to_command_string(), route);
        }

        index.ordered = index.routes.keys().cloned().collect();
        index.ordered.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        log::debug!("Alias index built with {} aliases.", index.ordered.len());
        index
    }

    fn register(&mut self, alias: &str, route: &CommandRoute) {
        let normalized = normalize_alias(alias);
        if normalized.is_empty() {
            return;
        }
        if let Some(previous) = self.routes.insert(normalized.clone(), route.clone()) {
            if &previous != route {
                log::warn!(
                    "Alias '{}' is configured for both '{}' and '{}'; using '{}'.",
                    normalized,
                    previous,
                    route,
                    route
                );
            }
        }
    }

    /// Resolves `input` against the longest matching alias.
    ///
    /// An alias matches when the input starts with it (ignoring case) and the
    /// next character, if any, is whitespace.
    pub fn resolve(&self, input: &str) -> Option<Resolution> {
        let trimmed = input.trim_start();
        if trimmed.is_empty() {
            return None;
        }

        self.ordered.iter().find_map(|alias| {
            let rest = strip_prefix_ignore_case(trimmed, alias)?;
            if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
                return None;
            }
            let route = self.routes.get(alias)?;
            Some(Resolution {
                route: route.clone(),
                alias: alias.clone(),
                remainder: rest.trim().to_string(),
            })
        })
    }

    /// Canonical text for `input`, or the input with leading whitespace trimmed if nothing matches.
    pub fn normalize_incoming(&self, input: &str) -> String {
        match self.resolve(input) {
            Some(resolution) => resolution.canonical(),
            None => input.trim_start().to_string(),
        }
    }

    /// Every alias registered for `route`, longest first.
    pub fn aliases_for(&self, route: &CommandRoute) -> Vec<&str> {
        self.ordered
            .iter()
            .filter(|alias| self.routes.get(*alias) == Some(route))
            .map(String::as_str)
            .collect()
    }

    /// Route registered for exactly `alias`, after normalization.
    pub fn route_for(&self, alias: &str) -> Option<&CommandRoute> {
        self.routes.get(&normalize_alias(alias))
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// True if no alias is registered.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Returns what follows `prefix` in `input` when `input` starts with it, ignoring case.
///
/// `prefix` must be normalized (see [`normalize_alias`]); each of its spaces
/// matches a whole run of whitespace in `input`.
fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let mut expected = prefix.chars();
    let mut chars = input.char_indices().peekable();

    while let Some(wanted) = expected.next() {
        let (_, ch) = chars.next()?;
        if wanted == ' ' {
            if !ch.is_whitespace() {
                return None;
            }
            while chars.next_if(|(_, next)| next.is_whitespace()).is_some() {}
            continue;
        }

        let mut lowered = ch.to_lowercase();
        if lowered.next() != Some(wanted) {
            return None;
        }
        for extra in lowered {
            if expected.next() != Some(extra) {
                return None;
            }
        }
    }

    let rest = chars.peek().map_or(input.len(), |(position, _)| *position);
    input.get(rest..)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommandDefinition, CommandSettings};

    fn descriptor(key: &str, aliases: &[&str]) -> CommandDescriptor {
        let route = CommandRoute::from_key(key);
        let definition = CommandDefinition {
            name: route.leaf().to_string(),
            route,
            group: None,
            admin_only: false,
            description: String::new(),
            shorthand: None,
            usage: String::new(),
        };
        let settings = CommandSettings {
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        };
        CommandDescriptor::new(definition, settings)
    }

    fn index(descriptors: &[CommandDescriptor]) -> AliasIndex {
        AliasIndex::build(descriptors, true)
    }

    #[test]
    fn test_longest_alias_wins() {
        let idx = index(&[
            descriptor("teleport", &["tp"]),
            descriptor("teleporthorse", &["tphorse"]),
        ]);

        let resolution = idx.resolve("tphorse target").unwrap();
        assert_eq!(resolution.route, CommandRoute::from_key("teleporthorse"));
        assert_eq!(resolution.remainder, "target");
        assert_eq!(resolution.canonical(), "teleporthorse target");

        let resolution = idx.resolve("tp target").unwrap();
        assert_eq!(resolution.route, CommandRoute::from_key("teleport"));
    }

    #[test]
    fn test_alias_must_end_at_word_boundary() {
        let idx = index(&[
            descriptor("teleport", &["tp"]),
            descriptor("teleporthorse", &["tphorse"]),
        ]);
        assert_eq!(idx.resolve("tphorsey"), None);
        assert_eq!(idx.resolve("tpx 1 2 3"), None);
        assert!(idx.resolve("tphorse").is_some());
        assert!(idx.resolve("tphorse\tnow").is_some());
    }

    #[test]
    fn test_canonical_route_is_always_an_alias() {
        let idx = index(&[descriptor("arena.start", &[])]);
        let resolution = idx.resolve("  ARENA Start   red  blue ").unwrap();
        assert_eq!(resolution.alias, "arena start");
        assert_eq!(resolution.remainder, "red  blue");
        assert_eq!(resolution.canonical(), "arena start red  blue");
    }

    #[test]
    fn test_case_insensitive_match() {
        let idx = index(&[descriptor("fly", &["Soar"])]);
        let resolution = idx.resolve("SOAR high").unwrap();
        assert_eq!(resolution.route, CommandRoute::from_key("fly"));
        assert_eq!(resolution.remainder, "high");
    }

    #[test]
    fn test_last_registration_wins() {
        let idx = index(&[descriptor("fly", &["up"]), descriptor("jump", &["up"])]);
        assert_eq!(idx.route_for("UP"), Some(&CommandRoute::from_key("jump")));
    }

    #[test]
    fn test_customization_disabled_only_routes() {
        let descriptors = [descriptor("arena.start", &["go"])];
        let idx = AliasIndex::build(&descriptors, false);
        assert_eq!(idx.len(), 1);
        assert!(idx.resolve("go").is_none());
        assert!(idx.resolve("arena start").is_some());
    }

    #[test]
    fn test_configured_alias_cannot_shadow_a_canonical_form() {
        let idx = index(&[descriptor("fly", &["^"]), descriptor("flyup", &["fly"])]);
        let resolution = idx.resolve("fly 10").unwrap();
        assert_eq!(resolution.route, CommandRoute::from_key("fly"));
        assert_eq!(resolution.remainder, "10");
        assert_eq!(idx.route_for("flyup"), Some(&CommandRoute::from_key("flyup")));
    }

    #[test]
    fn test_inner_whitespace_runs_match_a_single_space() {
        let idx = index(&[descriptor("config.reload", &["cfg   r"])]);

        let resolution = idx.resolve("cfg   r x").unwrap();
        assert_eq!(resolution.route, CommandRoute::from_key("config.reload"));
        assert_eq!(resolution.alias, "cfg r");
        assert_eq!(resolution.remainder, "x");

        assert!(idx.resolve("CFG\tR").is_some());
        assert!(idx.resolve("config \t reload now").is_some());
        assert!(idx.resolve("cfgr").is_none());
    }

    #[test]
    fn test_normalize_incoming() {
        let idx = index(&[descriptor("config.reload", &["cfg   r"])]);
        assert_eq!(idx.normalize_incoming("cfg r"), "config reload");
        assert_eq!(idx.normalize_incoming("   unknown thing"), "unknown thing");
        assert_eq!(idx.normalize_incoming(""), "");
    }

    #[test]
    fn test_aliases_for_route() {
        let idx = index(&[descriptor("teleporthorse", &["tphorse", "th"])]);
        let route = CommandRoute::from_key("teleporthorse");
        assert_eq!(idx.aliases_for(&route), vec!["teleporthorse", "tphorse", "th"]);
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        let idx = index(&[descriptor("fly", &["ß"])]);
        assert!(idx.resolve("ßx").is_none());
        assert!(idx.resolve("ß now").is_some());
        assert!(idx.resolve("İstanbul").is_none());
    }
}
