// src/core/route.rs

use std::fmt;

/// Canonical, ordered identifier of a command (`group leaf` or just `leaf`).
///
/// Segments are trimmed and lower-cased on construction, so the derived
/// equality and hashing are case-insensitive while staying order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandRoute {
    segments: Vec<String>,
}

impl CommandRoute {
    /// Builds a route from raw segments. Blank segments are dropped.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = segments
            .into_iter()
            .map(|segment| segment.as_ref().trim().to_lowercase())
            .filter(|segment| !segment.is_empty())
            .collect();
        Self { segments }
    }

    /// Parses a dotted (or space separated) map key such as `arena.start`.
    pub fn from_key(key: &str) -> Self {
        Self::new(split_key(key))
    }

    /// Parses a user-facing command string such as `arena start`.
    pub fn from_command_string(command: &str) -> Self {
        Self::new(command.split_whitespace())
    }

    /// Re-normalizes an arbitrary hand-edited key: trimmed, lower-cased, dot-joined.
    pub fn normalize_key(key: &str) -> String {
        Self::from_key(key).key()
    }

    /// Normalized segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, i.e. the command's own name.
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// True for a route without segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Dotted form used as the config map key.
    pub fn key(&self) -> String {
        self.segments.join(".")
    }

    /// Space-joined form, the canonical command text.
    pub fn to_command_string(&self) -> String {
        self.segments.join(" ")
    }
}

impl fmt::Display for CommandRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_string())
    }
}

fn split_key(key: &str) -> impl Iterator<Item = &str> {
    key.split(|c: char| c == '.' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
}
