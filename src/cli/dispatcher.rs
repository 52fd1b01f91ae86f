use anyhow::Result;
use std::sync::Arc;

use crate::{cli::handlers, state::CommandRouter};

/// An operator action, its aliases, and its handler.
struct ActionDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &Arc<CommandRouter>) -> Result<()>,
}

/// The single source of truth for all operator actions.
static ACTION_REGISTRY: &[ActionDefinition] = &[
    ActionDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    ActionDefinition {
        name: "show",
        aliases: &["help"],
        handler: handlers::show::handle,
    },
    ActionDefinition {
        name: "resolve",
        aliases: &["res"],
        handler: handlers::resolve::handle,
    },
    ActionDefinition {
        name: "reload",
        aliases: &[],
        handler: handlers::reload::handle,
    },
    ActionDefinition {
        name: "save",
        aliases: &[],
        handler: handlers::save::handle,
    },
    ActionDefinition {
        name: "info",
        aliases: &[],
        handler: handlers::info::handle,
    },
    ActionDefinition {
        name: "colors",
        aliases: &[],
        handler: handlers::colors::handle,
    },
    ActionDefinition {
        name: "watch",
        aliases: &[],
        handler: handlers::watch::handle,
    },
];

/// Finds an action in the registry by its name or alias.
fn find_action(name: &str) -> Option<&'static ActionDefinition> {
    ACTION_REGISTRY
        .iter()
        .find(|action| action.name == name || action.aliases.contains(&name))
}

/// Names of every registered action, for error messages and completion.
pub fn action_names() -> Vec<&'static str> {
    ACTION_REGISTRY.iter().map(|action| action.name).collect()
}

/// Routes `args` to the matching handler.
///
/// - No arguments: `info`.
/// - `<action> [args...]`: that action.
/// - Anything else is treated as text to resolve (`cmdalias tphorse me`).
pub fn dispatch(args: Vec<String>, router: &Arc<CommandRouter>) -> Result<()> {
    log::debug!("Dispatching args: {:?}", args);

    let mut args = args.into_iter();
    let Some(first) = args.next() else {
        return handlers::info::handle(Vec::new(), router);
    };

    match find_action(&first) {
        Some(action) => (action.handler)(args.collect(), router),
        None => {
            let mut text = vec![first];
            text.extend(args);
            handlers::resolve::handle(text, router)
        }
    }
}
