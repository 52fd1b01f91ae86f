//! # Alias Generator
//!
//! Deterministic, collision-free synthesis of shorthands and compound aliases.
//!
//! Every candidate goes through [`UsedAliases::claim`], which lower-cases it and
//! appends an ascending integer suffix (`2`, `3`, ...) until it is unique. The
//! set is seeded with every alias already recorded in the config document before
//! anything is generated, so aliases handed out on earlier runs never move.
//! Canonical route strings and display names are reserved for their own command,
//! so a generated alias never shadows another command's canonical form.

use crate::core::resolver::normalize_alias;
use crate::models::{CommandDefinition, ConfigDocument};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// Hand-picked shorthands that win over every generation rule, keyed by route-key.
    static ref ALIAS_OVERRIDES: HashMap<&'static str, &'static str> = HashMap::from([
        ("assignsteamid", "idset"),
        ("autoadminauth", "autoauth"),
        ("bloodpotion", "bloodpot"),
        ("bloodpotionmix", "bloodmix"),
        ("cleancontainerlessshards", "cleanshard"),
        ("customspawn", "spawnmod"),
        ("customspawnat", "spawnat"),
        ("despawnnpc", "npcclr"),
        ("everyonedaywalker", "dayon"),
        ("flyheight", "flyhi"),
        ("flylevel", "flylvl"),
        ("flyobstacleheight", "flyclear"),
        ("frozenhearts", "heartlist"),
        ("killplayer", "killp"),
        ("playerheartcount", "heartcnt"),
        ("plotinfo", "plotdata"),
        ("reloadadmin", "adminreload"),
        ("relocatereset", "relreset"),
        ("removestaff", "staffrm"),
        ("revealmapforallplayers", "mapall"),
        ("spawnban", "spawnbans"),
        ("spectate", "spect"),
        ("staydown", "stickdown"),
        ("swapplayers", "swapid"),
        ("teleporthorse", "tphorse"),
        ("thawheart", "heartthaw"),
        ("toggleadmin", "admintoggle"),
        ("unbindplayer", "unbind"),
        ("whereami", "where"),
        ("playerinfo", "pinfo"),
        ("god", "+"),
        ("mortal", "-"),
        ("teleport", "tpt"),
        ("fly", "^"),
        ("flydown", "fd"),
    ]);

    static ref TOKEN_PATTERN: Regex =
        Regex::new(r"[A-Z]+[a-z]*|[a-z]+|\d+").expect("token pattern is valid");
}

/// The explicit override for `route_key`, if one exists.
pub fn alias_override(route_key: &str) -> Option<&'static str> {
    ALIAS_OVERRIDES.get(route_key).copied()
}

/// Case-insensitive set of aliases already handed out.
///
/// Besides plain aliases it holds reservations: canonical route strings and
/// display names, each owned by one route-key. A reservation blocks every
/// other command from claiming that text, but not its owner.
#[derive(Debug, Clone, Default)]
pub struct UsedAliases {
    aliases: HashSet<String>,
    reserved: HashMap<String, String>,
}

impl UsedAliases {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the set with every shorthand and extra alias recorded in `document`,
    /// and reserves every configured display name for its own command.
    pub fn from_document(document: &ConfigDocument) -> Self {
        let mut used = Self::new();
        for (key, settings) in &document.commands {
            used.insert(&settings.shorthand);
            for alias in &settings.aliases {
                used.insert(alias);
            }
            used.reserve(&settings.name, key);
        }
        used
    }

    /// Records `alias` as taken. Blank values are ignored.
    pub fn insert(&mut self, alias: &str) {
        let normalized = normalize_alias(alias);
        if !normalized.is_empty() {
            self.aliases.insert(normalized);
        }
    }

    /// Reserves `alias` for the command with `route_key`. Blank values are ignored.
    pub fn reserve(&mut self, alias: &str, route_key: &str) {
        let normalized = normalize_alias(alias);
        if !normalized.is_empty() {
            self.reserved.entry(normalized).or_insert_with(|| route_key.to_string());
        }
    }

    /// True if `alias` is taken or reserved by anyone.
    pub fn contains(&self, alias: &str) -> bool {
        let normalized = normalize_alias(alias);
        self.aliases.contains(&normalized) || self.reserved.contains_key(&normalized)
    }

    /// Number of distinct taken or reserved aliases.
    pub fn len(&self) -> usize {
        let reserved_only = self
            .reserved
            .keys()
            .filter(|alias| !self.aliases.contains(*alias))
            .count();
        self.aliases.len() + reserved_only
    }

    /// True if nothing is taken or reserved.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.reserved.is_empty()
    }

    fn is_free_for(&self, alias: &str, owner: Option<&str>) -> bool {
        !self.aliases.contains(alias)
            && self
                .reserved
                .get(alias)
                .is_none_or(|reserved_by| Some(reserved_by.as_str()) == owner)
    }

    /// Makes `candidate` unique, records it, and returns it. `None` for blank candidates.
    pub fn claim(&mut self, candidate: &str) -> Option<String> {
        self.claim_as(candidate, None)
    }

    /// Like [`claim`](Self::claim), but text reserved for `route_key` counts as free.
    pub fn claim_for(&mut self, candidate: &str, route_key: &str) -> Option<String> {
        self.claim_as(candidate, Some(route_key))
    }

    fn claim_as(&mut self, candidate: &str, owner: Option<&str>) -> Option<String> {
        let alias = normalize_alias(candidate);
        if alias.is_empty() {
            return None;
        }

        let unique = if self.is_free_for(&alias, owner) {
            alias
        } else {
            (2u32..)
                .map(|counter| format!("{}{}", alias, counter))
                .find(|suffixed| self.is_free_for(suffixed, owner))
                .unwrap_or_default()
        };

        self.aliases.insert(unique.clone());
        Some(unique)
    }
}

/// Splits `value` on case boundaries and digit runs, lower-cased.
///
/// `TeleportHorse` -> `["teleport", "horse"]`, `HTTPServer2` -> `["http", "server", "2"]`.
/// A value without any letter or digit comes back whole.
pub fn tokenize(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    for found in TOKEN_PATTERN.find_iter(trimmed) {
        let word = found.as_str();
        let upper_run = word.chars().take_while(char::is_ascii_uppercase).count();
        // "HTTPServer": the last capital of a run starts the next word.
        if upper_run > 1 && upper_run < word.len() {
            let split = upper_run - 1;
            if let (Some(head), Some(tail)) = (word.get(..split), word.get(split..)) {
                tokens.push(head.to_lowercase());
                tokens.push(tail.to_lowercase());
                continue;
            }
        }
        tokens.push(word.to_lowercase());
    }

    if tokens.is_empty() {
        tokens.push(trimmed.to_lowercase());
    }
    tokens
}

fn acronym(tokens: &[String]) -> String {
    tokens
        .iter()
        .filter_map(|token| token.chars().next())
        .collect::<String>()
        .to_lowercase()
}

/// Candidate shorthand built purely from the leaf name, before uniqueness.
fn shorthand_candidate(definition: &CommandDefinition) -> Option<String> {
    let mut tokens = tokenize(&definition.name);
    if tokens.is_empty() {
        tokens = tokenize(definition.route.leaf());
    }

    match tokens.as_slice() {
        [] => None,
        [token] => {
            let length = token.chars().count();
            if length <= 5 {
                Some(token.clone())
            } else {
                let head: String = token.chars().take(3).collect();
                let tail: String = token.chars().skip(length - 2).collect();
                Some(format!("{}{}", head, tail))
            }
        }
        [first, ..] => {
            let letters = acronym(&tokens);
            if letters.chars().count() < 3 {
                Some(first.chars().take(3).collect())
            } else {
                Some(letters)
            }
        }
    }
}

/// Single-token alias: explicit override, then declared shorthand, then derived from the name.
pub fn generate_short(definition: &CommandDefinition, used: &mut UsedAliases) -> Option<String> {
    let key = definition.route.key();
    if let Some(preferred) = alias_override(&key) {
        return used.claim_for(preferred, &key);
    }
    if let Some(declared) = &definition.shorthand {
        return used.claim_for(declared, &key);
    }
    shorthand_candidate(definition).and_then(|candidate| used.claim_for(&candidate, &key))
}

/// Group-qualified candidate: `<group shorthand or name> <acronym of the leaf>`, before uniqueness.
///
/// Ungrouped commands have none.
pub fn compound_candidate(definition: &CommandDefinition) -> Option<String> {
    let group = definition.group.as_ref()?;
    let group_alias = group.shorthand.as_deref().unwrap_or(&group.name);

    let tokens = tokenize(&definition.name);
    let leaf_alias = if tokens.is_empty() {
        definition.name.to_lowercase()
    } else {
        acronym(&tokens)
    };

    Some(format!("{} {}", group_alias, leaf_alias))
}

/// Claims the compound alias for `definition`, unless it would merely repeat `shorthand`.
pub fn generate_compound(
    definition: &CommandDefinition,
    shorthand: &str,
    used: &mut UsedAliases,
) -> Option<String> {
    let candidate = compound_candidate(definition)?;
    if candidate.eq_ignore_ascii_case(shorthand.trim()) {
        return None;
    }
    used.claim_for(&candidate, &definition.route.key())
}
