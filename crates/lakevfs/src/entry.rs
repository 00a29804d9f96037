//! Directory entry mapping.
//!
//! Converts raw store listing records into the filesystem's directory
//! entry descriptor. Pure — no I/O happens here.

use crate::path::strip_trailing_slash;
use chrono::{DateTime, Utc};
use lakevfs_api::ObjectStats;

/// Kind of directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A directory entry as seen through the filesystem facade.
///
/// Invariants: file entries always carry a size and checksum;
/// directory entries report size 0 with no checksum or mtime, and
/// their key has the trailing `/` stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full flat key, `repository/ref/path`.
    pub key: String,
    /// Same as `key`; kept for callers that expect a display name.
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub checksum: Option<String>,
    pub modified: Option<DateTime<Utc>>,
}

impl DirEntry {
    /// Map one raw listing record into an entry under the given
    /// repository and ref.
    pub fn from_stats(repository: &str, reference: &str, stats: &ObjectStats) -> Self {
        let key = format!("{repository}/{reference}/{}", stats.path);
        if stats.is_object() {
            // Object keys never end in '/', nothing to strip.
            Self {
                name: key.clone(),
                key,
                kind: EntryKind::File,
                size: stats.size_bytes.unwrap_or(0),
                checksum: stats.checksum.clone(),
                modified: stats.mtime.and_then(|secs| DateTime::from_timestamp(secs, 0)),
            }
        } else {
            let key = strip_trailing_slash(&key).to_string();
            Self::directory(key)
        }
    }

    /// A synthetic directory entry for a key with no backing record
    /// (ref roots, directory probes).
    pub fn directory(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            kind: EntryKind::Directory,
            size: 0,
            checksum: None,
            modified: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_record_maps_to_file_entry() {
        let stats = ObjectStats::object("data/a.txt", "abc123", 42, 1_700_000_000);
        let entry = DirEntry::from_stats("repo", "main", &stats);
        assert_eq!(entry.key, "repo/main/data/a.txt");
        assert_eq!(entry.name, entry.key);
        assert_eq!(entry.kind, EntryKind::File);
        assert_eq!(entry.size, 42);
        assert_eq!(entry.checksum.as_deref(), Some("abc123"));
        let modified = entry.modified.unwrap();
        assert_eq!(modified.timestamp(), 1_700_000_000);
    }

    #[test]
    fn common_prefix_maps_to_directory_entry() {
        let stats = ObjectStats::common_prefix("data/");
        let entry = DirEntry::from_stats("repo", "main", &stats);
        assert_eq!(entry.key, "repo/main/data");
        assert_eq!(entry.kind, EntryKind::Directory);
        assert_eq!(entry.size, 0);
        assert_eq!(entry.checksum, None);
        assert_eq!(entry.modified, None);
    }
}
