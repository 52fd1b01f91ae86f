//! # Handler for the `list` action
//!
//! Prints an aligned table of every command visible to an audience: canonical form,
//! shorthand, extra aliases, status badges and description.

use anyhow::Result;
use clap::Parser;
use colored::*;
use dialoguer::console::measure_text_width;
use std::sync::Arc;

use crate::{
    cli::handlers::commons,
    models::CommandDescriptor,
    state::{Audience, CommandRouter},
};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "List commands and their aliases.")]
struct ListArgs {
    /// Which commands to list.
    #[arg(value_enum, default_value_t = Audience::All)]
    audience: Audience,

    /// Only show disabled commands.
    #[arg(long)]
    disabled: bool,
}

/// Prints the commands visible to the requested audience.
pub fn handle(args: Vec<String>, router: &Arc<CommandRouter>) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let snapshot = router.snapshot();

    let descriptors: Vec<&CommandDescriptor> = snapshot
        .descriptors_for(list_args.audience)
        .into_iter()
        .filter(|descriptor| !list_args.disabled || !descriptor.enabled())
        .collect();

    if descriptors.is_empty() {
        println!("\nNo commands to show.");
        return Ok(());
    }

    let enabled = descriptors.iter().filter(|d| d.enabled()).count();
    println!(
        "\n{} ({} enabled, {} disabled):",
        "Commands".bold(),
        enabled,
        descriptors.len() - enabled
    );

    let name_width = descriptors
        .iter()
        .map(|d| measure_text_width(&d.primary_alias()))
        .max()
        .unwrap_or(0);
    let shorthand_width = descriptors
        .iter()
        .map(|d| measure_text_width(&d.settings.shorthand))
        .max()
        .unwrap_or(0);

    for descriptor in descriptors {
        let name = if descriptor.enabled() {
            descriptor.primary_alias().cyan().to_string()
        } else {
            descriptor.primary_alias().dimmed().to_string()
        };
        let extras: Vec<&str> = descriptor
            .extra_aliases()
            .iter()
            .map(String::as_str)
            .filter(|alias| !alias.eq_ignore_ascii_case(&descriptor.settings.shorthand))
            .collect();

        let mut line = format!(
            "  {}  {}",
            commons::pad(&name, name_width),
            commons::pad(&descriptor.settings.shorthand.green().to_string(), shorthand_width)
        );
        if !extras.is_empty() {
            line.push_str(&format!("  [{}]", extras.join(", ")));
        }
        let badges = commons::badges(descriptor);
        if !badges.is_empty() {
            line.push_str(&format!("  {}", badges));
        }
        if !descriptor.description().is_empty() {
            line.push_str(&format!("  {}", descriptor.description().dimmed()));
        }
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args() {
        let args = ListArgs::try_parse_from(["admin", "--disabled"]).unwrap();
        assert_eq!(args.audience, Audience::Admin);
        assert!(args.disabled);

        let args = ListArgs::try_parse_from(Vec::<String>::new()).unwrap();
        assert_eq!(args.audience, Audience::All);

        assert!(ListArgs::try_parse_from(["moderators"]).is_err());
    }
}
