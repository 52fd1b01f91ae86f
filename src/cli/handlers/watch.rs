//! # Handler for the `watch` action
//!
//! Keeps the router live: a poller reports changes to the config file, the
//! hot-reload watcher applies them, and every line read from stdin is resolved
//! against whatever snapshot is published at that moment. Ends on EOF or Ctrl+C.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    cli::handlers::commons,
    constants::{POLL_INTERVAL, SETTLE_DELAY},
    state::CommandRouter,
    system::{poller::spawn_poller, watcher::HotReloadWatcher},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Hot-reload the configuration and resolve lines read from stdin."
)]
struct WatchArgs {
    /// Polling interval in milliseconds (default 200).
    #[arg(long)]
    interval: Option<u64>,
}

/// Runs the hot-reload loop until EOF or Ctrl+C.
pub fn handle(args: Vec<String>, router: &Arc<CommandRouter>) -> Result<()> {
    let watch_args = WatchArgs::try_parse_from(&args)?;
    let interval = watch_args
        .interval
        .map(|millis| Duration::from_millis(millis.max(10)))
        .unwrap_or(POLL_INTERVAL);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    let result = runtime.block_on(watch(Arc::clone(router), interval));
    // Stdin is read on a blocking thread that cannot be interrupted.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn watch(router: Arc<CommandRouter>, interval: Duration) -> Result<()> {
    let (sender, watcher) = HotReloadWatcher::spawn(Arc::clone(&router));
    let poller = spawn_poller(router.config_path().to_path_buf(), interval, sender);

    println!(
        "{} Watching {} (settle {} ms). Type a command to resolve it; Ctrl+C to stop.",
        "●".green(),
        router.config_path().display(),
        SETTLE_DELAY.as_millis()
    );
    if !router.reload_on_change_enabled() {
        println!(
            "  {}",
            "reloadConfigOnChange is off: edits are ignored until it is turned on and `reload` is run."
                .yellow()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let outcome = loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => resolve_line(&router, &line),
                Ok(None) => break Ok(()),
                Err(e) => break Err(e).context("Failed to read from stdin"),
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                break Ok(());
            }
        }
    };

    poller.abort();
    watcher.shutdown().await;
    outcome
}

fn resolve_line(router: &CommandRouter, line: &str) {
    if line.trim().is_empty() {
        return;
    }

    let snapshot = router.snapshot();
    match snapshot.preprocess_chat(line) {
        Some(rewritten) if rewritten != line => {
            println!("  {} {}", "→".green(), rewritten.bold());
        }
        Some(_) => {
            println!("  {} nothing to rewrite", "·".dimmed());
        }
        None => {
            commons::print_resolution(&snapshot, line);
        }
    }
}
