// src/cli/handlers/reload.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::sync::Arc;

use crate::state::CommandRouter;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Re-read the config file, reconcile it and publish the result."
)]
struct ReloadArgs {}

/// Reloads the config file and prints the reconcile report.
pub fn handle(args: Vec<String>, router: &Arc<CommandRouter>) -> Result<()> {
    let _reload_args = ReloadArgs::try_parse_from(&args)?;

    let report = router.reload().with_context(|| {
        format!(
            "Failed to reload '{}'. The previous configuration is still active",
            router.config_path().display()
        )
    })?;

    println!("{} Configuration reloaded ({}).", "✔".green(), report);
    for key in &report.added {
        println!("  {} {}", "+".green(), key);
    }
    for key in &report.updated {
        println!("  {} {}", "~".yellow(), key);
    }
    for key in &report.removed {
        println!("  {} {}", "-".red(), key);
    }
    Ok(())
}
