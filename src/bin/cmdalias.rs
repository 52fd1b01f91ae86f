// src/bin/cmdalias.rs

//! Operator command-line entry point for `cmdalias`.

use anyhow::{Context, Result};
use clap::Parser;
use cmdalias::{
    cli::{Cli, dispatcher},
    core::{
        catalog::{CommandCatalog, CommandRegistry},
        config_store::ConfigStore,
        paths,
    },
    state::CommandRouter,
};
use colored::*;
use std::sync::Arc;

/// The main entry point of the `cmdalias` application.
/// It sets up logging, parses arguments, builds the router, dispatches to the
/// correct handler, and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // `{:#}` prints the whole context chain on one line.
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let registry = match &cli.manifest {
        Some(raw) => {
            let path = paths::expand_path(raw)?;
            CommandRegistry::from_manifest_file(&path)
                .with_context(|| format!("Could not load command manifest '{}'", raw))?
        }
        None => CommandRegistry::builtin(),
    };
    let catalog = CommandCatalog::discover(&registry);

    let config_path = paths::resolve_config_path(cli.config.as_deref())
        .context("Could not determine where the command configuration lives")?;
    let router = Arc::new(CommandRouter::open(catalog, ConfigStore::new(config_path)));

    dispatcher::dispatch(cli.args, &router)
}
