// src/core/mod.rs

/// Shorthand and compound alias synthesis.
pub mod alias_generator;
/// Command declarations and their discovery.
pub mod catalog;
/// Reply palette and color markup.
pub mod color;
/// Loading and saving `command_config.json`.
pub mod config_store;
/// On-disk identity of the config file.
pub mod fingerprint;
/// Config location and path expansion.
pub mod paths;
/// Keeps the config document in line with the catalog.
pub mod reconcile;
/// Longest-match alias lookup.
pub mod resolver;
/// Command routes and their key and text forms.
pub mod route;
