// src/cli/handlers/info.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use std::sync::Arc;
use std::time::SystemTime;

use crate::{
    core::fingerprint::FileFingerprint,
    models::GeneralSettings,
    state::{Audience, CommandRouter},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Displays the config file location and the general settings."
)]
struct InfoArgs {}

/// Displays configuration file information, command counts and general settings.
pub fn handle(args: Vec<String>, router: &Arc<CommandRouter>) -> Result<()> {
    let _info_args = InfoArgs::try_parse_from(&args)?;
    let snapshot = router.snapshot();

    println!("\n--- {} ---", "Command Configuration".yellow());
    println!("  {:<22} {}", "Config file".blue(), router.config_path().display());

    match FileFingerprint::of(router.config_path()) {
        Ok(fingerprint) => {
            println!("  {:<22} {} bytes", "File size".blue(), fingerprint.len);
            println!(
                "  {:<22} {}",
                "Last modified".blue(),
                describe_age(fingerprint.modified)
            );
            println!("  {:<22} {}", "Content hash".blue(), fingerprint.content_hash);
        }
        Err(e) => println!("  {:<22} {}", "File".blue(), e.to_string().red()),
    }

    let total = snapshot.descriptors.len();
    let enabled = snapshot.descriptors.iter().filter(|d| d.enabled()).count();
    let admin = snapshot.descriptors_for(Audience::Admin).len();
    println!("\n  {:<22} {}", "Total commands".blue(), total);
    println!("  {:<22} {}", "Enabled commands".blue(), enabled);
    println!("  {:<22} {}", "Admin-only commands".blue(), admin);
    println!("  {:<22} {}", "Indexed aliases".blue(), snapshot.index.len());

    print_general(&snapshot.general);
    Ok(())
}

fn print_general(general: &GeneralSettings) {
    println!();
    println!(
        "  {:<22} {}",
        "Custom colors".blue(),
        yes_no(general.enable_custom_colors)
    );
    println!(
        "  {:<22} {}",
        "Command customization".blue(),
        yes_no(general.enable_command_customization)
    );
    println!(
        "  {:<22} {}",
        "Reload on change".blue(),
        yes_no(general.reload_config_on_change)
    );
    println!("  {:<22} {}", "Command prefix".blue(), general.command_prefix);
}

fn yes_no(value: bool) -> ColoredString {
    if value { "yes".green() } else { "no".red() }
}

fn describe_age(modified: SystemTime) -> String {
    match SystemTime::now().duration_since(modified) {
        Ok(age) if age.as_secs() < 60 => format!("{}s ago", age.as_secs()),
        Ok(age) if age.as_secs() < 3600 => format!("{}m ago", age.as_secs() / 60),
        Ok(age) if age.as_secs() < 86_400 => format!("{}h ago", age.as_secs() / 3600),
        Ok(age) => format!("{}d ago", age.as_secs() / 86_400),
        Err(_) => "in the future".to_string(),
    }
}
