//! # cmdalias
//!
//! Routes short text commands to registered handlers while letting an operator rename,
//! alias, enable/disable and recolor them through an editable JSON file.
//!
//! The runtime entry point is [`state::CommandRouter`]: it owns the discovered
//! [`core::catalog::CommandCatalog`], the [`core::config_store::ConfigStore`] and the
//! published alias index. [`system::watcher`] drives hot reloads from file-change events.

/// Operator command-line interface: argument parsing, action dispatch and handlers.
pub mod cli;
/// Application-wide names and timings.
pub mod constants;
/// Discovery, persistence, alias generation and resolution.
pub mod core;
/// Persisted settings and runtime command models.
pub mod models;
/// The shared router and its published snapshots.
pub mod state;
/// Change detection and hot reload.
pub mod system;
