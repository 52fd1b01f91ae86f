// src/cli/handlers/colors.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use std::sync::Arc;

use crate::{
    cli::handlers::commons,
    core::color::{self, ColorKind},
    state::CommandRouter,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Preview the reply color palette.")]
struct ColorsArgs {
    /// Also print the markup a reply of each kind is sent with.
    #[arg(long)]
    markup: bool,
}

/// Prints every palette slot with a live swatch.
pub fn handle(args: Vec<String>, router: &Arc<CommandRouter>) -> Result<()> {
    let colors_args = ColorsArgs::try_parse_from(&args)?;
    let snapshot = router.snapshot();

    println!("\n--- {} ---", "Color Configuration".yellow());
    if !snapshot.general.enable_custom_colors {
        println!("  {}", "Custom colors are disabled; replies are sent uncolored.".dimmed());
    }

    for kind in ColorKind::ALL {
        let value = kind.color_in(&snapshot.colors);
        let sample = format!("Example {} message", kind.name());
        let swatch = if color::parse_hex(value).is_some() {
            color::preview(&sample, value).to_string()
        } else {
            format!("{} {}", sample, "(not a #rrggbb value)".red())
        };
        println!(
            "  {}  {}  {}",
            commons::pad(&kind.name().blue().to_string(), 10),
            commons::pad(value, 8),
            swatch
        );
        if colors_args.markup {
            println!("  {:<10}  {:<8}  {}", "", "", snapshot.format_message(&sample, kind).dimmed());
        }
    }
    Ok(())
}
