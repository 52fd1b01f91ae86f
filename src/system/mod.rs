//! # System Interaction Layer
//!
//! Everything that touches time and the filesystem outside of plain load/save.
//!
//! ## Modules
//!
//! - **`watcher`**: The hot-reload task. Consumes "config changed" notifications,
//!   filters out our own writes, debounces bursts and reloads the router on the
//!   blocking pool.
//! - **`poller`**: A fingerprint-based change source that produces those
//!   notifications by polling the config file.

/// Fingerprint polling change source.
pub mod poller;
/// Debounced hot-reload task.
pub mod watcher;
