//! # Hot Reload Watcher
//!
//! Reacts to "config file changed" notifications by reloading the router.
//!
//! Notifications may arrive duplicated or in bursts. The watcher ignores the ones
//! caused by our own saves, waits for a burst to settle, collapses everything
//! queued meanwhile into a single reload and runs that reload on the blocking pool.
//! A failed reload is logged and the previous snapshot stays published.

use crate::constants::SETTLE_DELAY;
use crate::state::CommandRouter;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Capacity of the notification channel. Senders wait when it is full.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A single "the config file changed" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigChange {
    /// When the change was observed.
    pub observed_at: SystemTime,
}

impl ConfigChange {
    /// A change observed right now.
    pub fn now() -> Self {
        Self {
            observed_at: SystemTime::now(),
        }
    }
}

/// Stops the watcher task.
#[derive(Debug)]
pub struct WatcherHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Signals the task and waits for it to finish. A pending settle delay is abandoned.
    pub async fn shutdown(mut self) {
        if let Some(signal) = self.shutdown.take() {
            let _ = signal.send(());
        }
        if let Err(e) = self.task.await {
            log::error!("Config watcher task ended abnormally: {}", e);
        }
    }

    /// True once the task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawner for the hot-reload task.
#[derive(Debug)]
pub struct HotReloadWatcher;

impl HotReloadWatcher {
    /// Spawns the watcher on the current tokio runtime.
    ///
    /// Feed the returned sender with [`ConfigChange`]s. The task ends when the
    /// handle is shut down or dropped, or when every sender is dropped.
    pub fn spawn(router: Arc<CommandRouter>) -> (mpsc::Sender<ConfigChange>, WatcherHandle) {
        Self::spawn_with_delay(router, SETTLE_DELAY)
    }

    /// Like [`spawn`](Self::spawn) with a custom settle delay.
    pub fn spawn_with_delay(
        router: Arc<CommandRouter>,
        settle_delay: Duration,
    ) -> (mpsc::Sender<ConfigChange>, WatcherHandle) {
        let (sender, receiver) = mpsc::channel(CHANGE_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run(router, receiver, shutdown_rx, settle_delay));
        let handle = WatcherHandle {
            shutdown: Some(shutdown_tx),
            task,
        };
        (sender, handle)
    }
}

async fn run(
    router: Arc<CommandRouter>,
    mut events: mpsc::Receiver<ConfigChange>,
    mut shutdown: oneshot::Receiver<()>,
    settle_delay: Duration,
) {
    log::debug!("Config watcher started for {}", router.config_path().display());

    loop {
        let change = tokio::select! {
            _ = &mut shutdown => break,
            event = events.recv() => match event {
                Some(change) => change,
                None => break,
            },
        };

        if !router.reload_on_change_enabled() {
            log::debug!("Config change ignored: reloading on change is disabled.");
            continue;
        }
        if is_self_induced(&router, change).await {
            log::debug!("Config change ignored: caused by our own save.");
            continue;
        }

        tokio::select! {
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(settle_delay) => {}
        }

        let mut coalesced = 0usize;
        while events.try_recv().is_ok() {
            coalesced += 1;
        }
        if coalesced > 0 {
            log::debug!("Coalesced {} further config change notifications.", coalesced);
        }

        let reloading = Arc::clone(&router);
        match tokio::task::spawn_blocking(move || reloading.reload()).await {
            Ok(Ok(report)) => log::info!("Command configuration hot-reloaded ({}).", report),
            Ok(Err(e)) => log::error!(
                "Hot reload failed, keeping the current configuration: {}",
                e
            ),
            Err(e) => log::error!("Hot reload task failed: {}", e),
        }
    }

    log::debug!("Config watcher stopped.");
}

async fn is_self_induced(router: &Arc<CommandRouter>, change: ConfigChange) -> bool {
    let router = Arc::clone(router);
    tokio::task::spawn_blocking(move || router.is_self_induced_change(change.observed_at))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{CommandCatalog, CommandDeclaration, CommandRegistry};
    use crate::core::config_store::ConfigStore;
    use crate::models::ConfigDocument;
    use std::fs;
    use tempfile::TempDir;

    const TEST_SETTLE: Duration = Duration::from_millis(20);

    fn router_in(dir: &TempDir) -> Arc<CommandRouter> {
        let mut registry = CommandRegistry::new();
        registry
            .register(CommandDeclaration::new("fly"))
            .register(CommandDeclaration::new("ping"));
        let catalog = CommandCatalog::discover(&registry);
        let store = ConfigStore::new(dir.path().join("command_config.json"));
        Arc::new(CommandRouter::open(catalog, store))
    }

    fn edit(router: &CommandRouter, change: impl FnOnce(&mut ConfigDocument)) {
        let content = fs::read_to_string(router.config_path()).unwrap();
        let mut document: ConfigDocument = serde_json::from_str(&content).unwrap();
        change(&mut document);
        fs::write(router.config_path(), serde_json::to_string_pretty(&document).unwrap()).unwrap();
    }

    /// Lets the self-write window of the initial save expire.
    async fn past_self_write_window() {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    async fn wait_until(condition: impl Fn() -> bool) -> bool {
        for _ in 0..100 {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        condition()
    }

    #[tokio::test]
    async fn test_operator_edit_is_applied() {
        let dir = TempDir::new().unwrap();
        let router = router_in(&dir);
        let (sender, handle) = HotReloadWatcher::spawn_with_delay(Arc::clone(&router), TEST_SETTLE);

        past_self_write_window().await;
        edit(&router, |document| {
            document.commands.get_mut("ping").unwrap().aliases = vec!["pong".to_string()];
        });
        sender.send(ConfigChange::now()).await.unwrap();

        assert!(wait_until(|| router.resolve("pong").is_some()).await);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_burst_is_coalesced_into_one_reload() {
        let dir = TempDir::new().unwrap();
        let router = router_in(&dir);
        let (sender, handle) = HotReloadWatcher::spawn_with_delay(Arc::clone(&router), TEST_SETTLE);

        past_self_write_window().await;
        for alias in ["a1", "a2", "a3"] {
            edit(&router, |document| {
                document.commands.get_mut("fly").unwrap().aliases = vec![alias.to_string()];
            });
            sender.send(ConfigChange::now()).await.unwrap();
        }

        assert!(wait_until(|| router.resolve("a3").is_some()).await);
        assert!(router.resolve("a1").is_none());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_bad_edit_keeps_last_known_good() {
        let dir = TempDir::new().unwrap();
        let router = router_in(&dir);
        let before = router.snapshot();
        let (sender, handle) = HotReloadWatcher::spawn_with_delay(Arc::clone(&router), TEST_SETTLE);

        past_self_write_window().await;
        fs::write(router.config_path(), "{ \"commands\": { ").unwrap();
        sender.send(ConfigChange::now()).await.unwrap();

        tokio::time::sleep(TEST_SETTLE * 10).await;
        assert!(Arc::ptr_eq(&before, &router.snapshot()));
        assert!(router.resolve("^ 5").is_some());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_own_save_is_ignored() {
        let dir = TempDir::new().unwrap();
        let router = router_in(&dir);
        let before = router.snapshot();
        let (sender, handle) = HotReloadWatcher::spawn_with_delay(Arc::clone(&router), TEST_SETTLE);

        router.save().unwrap();
        sender.send(ConfigChange::now()).await.unwrap();

        tokio::time::sleep(TEST_SETTLE * 10).await;
        assert!(Arc::ptr_eq(&before, &router.snapshot()));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_disabled_reload_on_change_ignores_events() {
        let dir = TempDir::new().unwrap();
        let router = router_in(&dir);
        edit(&router, |document| {
            document.general.reload_config_on_change = false;
        });
        router.reload().unwrap();
        let (sender, handle) = HotReloadWatcher::spawn_with_delay(Arc::clone(&router), TEST_SETTLE);

        past_self_write_window().await;
        edit(&router, |document| {
            document.commands.get_mut("ping").unwrap().aliases = vec!["pong".to_string()];
        });
        sender.send(ConfigChange::now()).await.unwrap();

        tokio::time::sleep(TEST_SETTLE * 10).await;
        assert!(router.resolve("pong").is_none());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_and_dropped_senders_end_the_task() {
        let dir = TempDir::new().unwrap();
        let router = router_in(&dir);

        let (sender, handle) = HotReloadWatcher::spawn_with_delay(Arc::clone(&router), TEST_SETTLE);
        handle.shutdown().await;
        assert!(sender.send(ConfigChange::now()).await.is_err());

        let (sender, handle) = HotReloadWatcher::spawn_with_delay(router, TEST_SETTLE);
        drop(sender);
        assert!(wait_until(|| handle.is_finished()).await);
    }
}
