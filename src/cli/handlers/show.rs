// src/cli/handlers/show.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use std::sync::Arc;

use crate::{cli::handlers::commons, core::color, state::CommandRouter};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Show everything known about one command.")]
struct ShowArgs {
    /// Route-key, canonical form or any alias of the command.
    #[arg(required = true, num_args = 1..)]
    command: Vec<String>,
}

/// Prints the details of one command.
pub fn handle(args: Vec<String>, router: &Arc<CommandRouter>) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    let wanted = show_args.command.join(" ");

    let snapshot = router.snapshot();
    let descriptor = snapshot
        .descriptor(&wanted)
        .ok_or_else(|| anyhow!("No command or alias named '{}'.", wanted))?;
    let settings = &descriptor.settings;
    let definition = &descriptor.definition;

    println!(
        "\n--- {} '{}' {}---",
        "Command".bold(),
        descriptor.primary_alias().yellow(),
        {
            let badges = commons::badges(descriptor);
            if badges.is_empty() { String::new() } else { format!("{} ", badges) }
        }
    );
    println!("  {:<12} {}", "route-key".blue(), definition.route.key());
    println!("  {:<12} {}", "name".blue(), settings.name);
    println!("  {:<12} {}", "shorthand".blue(), settings.shorthand.green());
    if let Some(group) = &definition.group {
        let group_label = match &group.shorthand {
            Some(shorthand) => format!("{} ({})", group.name, shorthand),
            None => group.name.clone(),
        };
        println!("  {:<12} {}", "group".blue(), group_label);
    }
    println!("  {:<12} {}", "category".blue(), descriptor.category());
    println!("  {:<12} {}", "enabled".blue(), descriptor.enabled());
    println!("  {:<12} {}", "admin-only".blue(), descriptor.admin_only());
    if !descriptor.description().is_empty() {
        println!("  {:<12} {}", "description".blue(), descriptor.description());
    }
    if !definition.usage.is_empty() {
        println!(
            "  {:<12} {} {}",
            "usage".blue(),
            descriptor.primary_alias(),
            definition.usage
        );
    }
    if !settings.custom_color.trim().is_empty() {
        println!(
            "  {:<12} {}",
            "color".blue(),
            color::preview(&settings.custom_color, &settings.custom_color)
        );
    }

    let indexed = snapshot.index.aliases_for(&definition.route);
    println!("  {:<12} {}", "aliases".blue(), descriptor.aliases.join(", "));
    if indexed.len() != descriptor.aliases.len() {
        println!(
            "  {:<12} {}",
            "resolving".blue(),
            if indexed.is_empty() {
                "(none)".red().to_string()
            } else {
                indexed.join(", ")
            }
        );
    }
    Ok(())
}
