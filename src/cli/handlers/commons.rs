// src/cli/handlers/commons.rs

// Shared output helpers used by multiple handlers.

use colored::*;
use dialoguer::console::measure_text_width;

use crate::{core::resolver::Resolution, models::CommandDescriptor, state::RouterSnapshot};

/// Short status badges for a descriptor (`[ADMIN]`, `[DISABLED]`), already colored.
pub fn badges(descriptor: &CommandDescriptor) -> String {
    let mut badges = Vec::new();
    if descriptor.admin_only() {
        badges.push("[ADMIN]".yellow().to_string());
    }
    if !descriptor.enabled() {
        badges.push("[DISABLED]".red().to_string());
    }
    badges.join(" ")
}

/// Pads `text` on the right to `width` visible columns, ignoring ANSI escapes.
pub fn pad(text: &str, width: usize) -> String {
    let visible = measure_text_width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(visible)))
}

/// Prints what `input` resolves to in `snapshot`. Returns false when nothing matched.
pub fn print_resolution(snapshot: &RouterSnapshot, input: &str) -> bool {
    match snapshot.resolve(input) {
        Some(resolution) => {
            print_match(snapshot, &resolution);
            true
        }
        None => {
            println!("  {} '{}' does not match any alias.", "✖".red(), input.trim());
            false
        }
    }
}

fn print_match(snapshot: &RouterSnapshot, resolution: &Resolution) {
    println!(
        "  {} {} -> {}",
        "✔".green(),
        resolution.alias.cyan(),
        resolution.canonical().bold()
    );
    println!("    {:<10} {}", "route".blue(), resolution.route.key());
    if !resolution.remainder.is_empty() {
        println!("    {:<10} {}", "args".blue(), resolution.remainder);
    }

    if let Some(descriptor) = snapshot.descriptor(&resolution.route.key()) {
        let badges = badges(descriptor);
        if !badges.is_empty() {
            println!("    {:<10} {}", "flags".blue(), badges);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_ignores_ansi_sequences() {
        colored::control::set_override(true);
        let colored = "abc".cyan().to_string();
        assert_eq!(measure_text_width(&pad(&colored, 6)), 6);
        assert_eq!(pad("abcdef", 3), "abcdef");
        colored::control::unset_override();
    }
}
