// src/core/fingerprint.rs

use std::{fs, io, path::Path, time::SystemTime};

const HASH_TRUNCATE_LENGTH: usize = 16; // 16 bytes = 32 hex characters

/// Identity of a config file's on-disk state.
///
/// The watcher compares the fingerprint seen after a change notification with the
/// one recorded at our own last save to tell self-induced writes from operator edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFingerprint {
    /// Last modification time.
    pub modified: SystemTime,
    /// Size in bytes.
    pub len: u64,
    /// Truncated blake3 hash of the content, hex-encoded.
    pub content_hash: String,
}

impl FileFingerprint {
    /// Reads metadata and content of `path`.
    ///
    /// # Errors
    /// Returns the I/O error if the file cannot be read or its metadata cannot be accessed.
    pub fn of(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let content = fs::read(path)?;
        Ok(Self {
            modified: metadata.modified()?,
            len: metadata.len(),
            content_hash: hash_content(&content),
        })
    }

    /// Same bytes on disk, regardless of timestamps.
    pub fn same_content(&self, other: &Self) -> bool {
        self.len == other.len && self.content_hash == other.content_hash
    }
}

/// Truncated blake3 digest of `content`, hex encoded.
pub fn hash_content(content: &[u8]) -> String {
    let hash = blake3::hash(content);
    hex::encode(hash.as_bytes().get(..HASH_TRUNCATE_LENGTH).unwrap_or_default())
}
