// src/system/poller.rs

use crate::core::fingerprint::FileFingerprint;
use crate::system::watcher::ConfigChange;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Polling change source: compares the file's fingerprint every `interval` and
/// emits a [`ConfigChange`] whenever it differs from the previous one.
///
/// Creation and deletion count as changes. The task ends once the receiving side
/// of `sender` is gone.
pub fn spawn_poller(
    path: PathBuf,
    interval: Duration,
    sender: mpsc::Sender<ConfigChange>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = FileFingerprint::of(&path).ok();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let current = FileFingerprint::of(&path).ok();
            if current == last {
                continue;
            }
            last = current;

            log::debug!("Change detected on {}", path.display());
            if sender.send(ConfigChange::now()).await.is_err() {
                break;
            }
        }

        log::debug!("Stopped polling {}", path.display());
    })
}
