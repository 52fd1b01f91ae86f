// src/cli/handlers/save.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::sync::Arc;

use crate::state::CommandRouter;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Write the current configuration back to disk.")]
struct SaveArgs {}

/// Writes the current document back to disk.
pub fn handle(args: Vec<String>, router: &Arc<CommandRouter>) -> Result<()> {
    let _save_args = SaveArgs::try_parse_from(&args)?;

    router
        .save()
        .with_context(|| format!("Failed to save '{}'", router.config_path().display()))?;

    println!(
        "{} Configuration saved to {}",
        "✔".green(),
        router.config_path().display()
    );
    Ok(())
}
