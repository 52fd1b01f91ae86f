// src/constants.rs

use std::time::Duration;

/// The name of the application directory inside the system config directory.
pub const APP_DIR: &str = "cmdalias";

/// The name of the command configuration file.
pub const CONFIG_FILENAME: &str = "command_config.json";

/// Suffix appended to a config file that failed to parse before it is replaced.
pub const CORRUPT_BACKUP_SUFFIX: &str = ".corrupt";

/// Category assigned to admin-only commands when the operator left it blank.
pub const ADMIN_CATEGORY: &str = "admin";

/// Category assigned to every other command when the operator left it blank.
pub const PLAYER_CATEGORY: &str = "player";

/// Change notifications arriving this close to our own save are treated as self-induced.
pub const SELF_WRITE_WINDOW: Duration = Duration::from_millis(250);

/// Quiet period the watcher waits for a burst of notifications to settle.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Interval used by the polling change source.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);
