//! Wire types shared by every `ObjectStore` implementation.
//!
//! Field names follow the lakeFS REST API (`snake_case` JSON), so the
//! HTTP backend can deserialize responses directly into these structs.

use serde::{Deserialize, Serialize};

/// Credential triple used to configure a store backend.
///
/// `endpoint_url` is the server host, with or without a scheme;
/// [`HttpStore`](crate::HttpStore) normalizes it to `https://` when no
/// scheme is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: String,
}

/// What a listing record describes: a real object or a virtual
/// directory produced by delimiter grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    Object,
    CommonPrefix,
}

/// One record from a listing or stat call.
///
/// Common-prefix records carry only `path` and `path_type`; checksum,
/// size, and mtime are present for objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStats {
    pub path: String,
    pub path_type: PathType,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    /// Modification time as epoch seconds (UTC).
    #[serde(default)]
    pub mtime: Option<i64>,
}

impl ObjectStats {
    /// Build an object record; mtime is epoch seconds.
    pub fn object(path: impl Into<String>, checksum: impl Into<String>, size: u64, mtime: i64) -> Self {
        Self {
            path: path.into(),
            path_type: PathType::Object,
            checksum: Some(checksum.into()),
            size_bytes: Some(size),
            mtime: Some(mtime),
        }
    }

    /// Build a common-prefix (virtual directory) record. The path keeps
    /// its trailing delimiter, as the server sends it.
    pub fn common_prefix(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            path_type: PathType::CommonPrefix,
            checksum: None,
            size_bytes: None,
            mtime: None,
        }
    }

    pub fn is_object(&self) -> bool {
        self.path_type == PathType::Object
    }
}

/// Server-driven pagination state attached to each listing page.
///
/// A `has_more == true` page carries the cursor to pass as `after` on
/// the next call; pages concatenate in receipt order into one sorted
/// listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub has_more: bool,
    #[serde(default)]
    pub next_offset: String,
}

/// One page of listing results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStatsList {
    pub results: Vec<ObjectStats>,
    pub pagination: Pagination,
}

/// Repository metadata. Only what the adapter needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub id: String,
    /// Creation time as epoch seconds (UTC).
    pub creation_date: i64,
    #[serde(default)]
    pub default_branch: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_stats_deserializes_object_record() {
        let json = r#"{
            "path": "data/a.txt",
            "path_type": "object",
            "checksum": "abc123",
            "size_bytes": 42,
            "mtime": 1700000000
        }"#;
        let stats: ObjectStats = serde_json::from_str(json).unwrap();
        assert!(stats.is_object());
        assert_eq!(stats.size_bytes, Some(42));
        assert_eq!(stats.checksum.as_deref(), Some("abc123"));
    }

    #[test]
    fn object_stats_deserializes_common_prefix_without_metadata() {
        let json = r#"{"path": "data/", "path_type": "common_prefix"}"#;
        let stats: ObjectStats = serde_json::from_str(json).unwrap();
        assert!(!stats.is_object());
        assert_eq!(stats.checksum, None);
        assert_eq!(stats.size_bytes, None);
        assert_eq!(stats.mtime, None);
    }

    #[test]
    fn pagination_defaults_to_done() {
        let page: ObjectStatsList = serde_json::from_str(
            r#"{"results": [], "pagination": {"has_more": false}}"#,
        )
        .unwrap();
        assert!(!page.pagination.has_more);
        assert_eq!(page.pagination.next_offset, "");
    }
}
