// src/cli/handlers/resolve.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use std::sync::Arc;

use crate::{
    cli::{dispatcher, handlers::commons},
    state::CommandRouter,
};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Resolve raw input to its canonical command.")]
struct ResolveArgs {
    /// Treat the input as a chat message: it must start with the command prefix.
    #[arg(long)]
    chat: bool,

    /// The text to resolve, e.g. `tphorse target`.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    text: Vec<String>,
}

/// Resolves the given text and prints the result.
pub fn handle(args: Vec<String>, router: &Arc<CommandRouter>) -> Result<()> {
    let resolve_args = ResolveArgs::try_parse_from(&args)?;
    let input = resolve_args.text.join(" ");
    let snapshot = router.snapshot();

    if resolve_args.chat {
        return match snapshot.preprocess_chat(&input) {
            Some(rewritten) => {
                println!("  {} {}", "→".green(), rewritten.bold());
                Ok(())
            }
            None => Err(anyhow!(
                "'{}' does not start with the command prefix '{}'.",
                input,
                snapshot.general.command_prefix
            )),
        };
    }

    if commons::print_resolution(&snapshot, &input) {
        Ok(())
    } else {
        Err(anyhow!(
            "Nothing to resolve. Known actions: {}.",
            dispatcher::action_names().join(", ")
        ))
    }
}
