// src/cli/handlers/mod.rs

// One module per operator action.

/// `colors`: palette preview.
pub mod colors;
/// Output helpers shared by handlers.
pub mod commons;
/// `info`: config file and router summary.
pub mod info;
/// `list`: command table.
pub mod list;
/// `reload`: strict reload from disk.
pub mod reload;
/// `resolve`: resolves text to a command.
pub mod resolve;
/// `save`: persists the current document.
pub mod save;
/// `show`: details of a single command.
pub mod show;
/// `watch`: hot reload with stdin resolution.
pub mod watch;
