//! Path codec for the three-segment address space.
//!
//! A flat path like `repo/main/data/file.txt` splits at the first two
//! `/` boundaries into (repository, ref, key). The key is everything
//! after the second slash; it may be empty and may itself contain `/`.
//! Nothing beyond the split is interpreted — no `.`/`..` resolution,
//! keys are opaque to the codec.

use crate::error::FsError;

/// Parsed (repository, ref, key) triple. A transient parse result, not
/// an owned entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub repository: String,
    pub reference: String,
    pub key: String,
}

impl Address {
    /// Split a path without validation. Missing segments come back
    /// empty: `parse("myrepo")` has an empty ref and key.
    pub fn parse(path: &str) -> Self {
        let (repository, rest) = partition(path);
        let (reference, key) = partition(rest);
        Self {
            repository: repository.to_string(),
            reference: reference.to_string(),
            key: key.to_string(),
        }
    }

    /// Split a path, requiring non-empty repository and ref segments.
    /// Every operation below the root goes through this.
    pub fn split(path: &str) -> Result<Self, FsError> {
        let addr = Self::parse(path);
        if addr.repository.is_empty() || addr.reference.is_empty() {
            return Err(FsError::Address {
                path: path.to_string(),
                reason: "expected repository/ref/key".to_string(),
            });
        }
        Ok(addr)
    }

    /// Re-join the three segments into the flat form. Inverse of
    /// [`Address::parse`] for any valid path.
    pub fn join(&self) -> String {
        format!("{}/{}/{}", self.repository, self.reference, self.key)
    }

    /// Absolute key for a store record path under this address's
    /// repository and ref.
    pub fn qualify(&self, record_path: &str) -> String {
        format!("{}/{}/{record_path}", self.repository, self.reference)
    }

    /// True when two addresses share the same (repository, ref) pair.
    pub fn same_tree(&self, other: &Address) -> bool {
        self.repository == other.repository && self.reference == other.reference
    }
}

/// Split at the first `/`; the separator is dropped. Like
/// `str::partition` in other languages: no `/` means the whole input is
/// the head and the tail is empty.
fn partition(s: &str) -> (&str, &str) {
    match s.find('/') {
        Some(idx) => (&s[..idx], &s[idx + 1..]),
        None => (s, ""),
    }
}

/// Remove exactly one trailing `/` if present.
pub fn strip_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}

/// Parent of a flat path: everything before the last `/`, or the empty
/// string at the top.
pub(crate) fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Canonical cache key for a path: drop any `scheme://` prefix, leading
/// slashes, and a trailing slash, so `lakefs://repo/main/data/` and
/// `repo/main/data` land on the same entry.
pub(crate) fn normalize(path: &str) -> &str {
    let path = match path.find("://") {
        Some(idx) => &path[idx + 3..],
        None => path,
    };
    strip_trailing_slash(path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_splits_on_first_two_slashes() {
        let addr = Address::parse("repo/main/data/file.txt");
        assert_eq!(addr.repository, "repo");
        assert_eq!(addr.reference, "main");
        assert_eq!(addr.key, "data/file.txt");
    }

    #[test]
    fn parse_allows_missing_segments() {
        let addr = Address::parse("repo");
        assert_eq!(addr.repository, "repo");
        assert_eq!(addr.reference, "");
        assert_eq!(addr.key, "");

        let addr = Address::parse("repo/main");
        assert_eq!(addr.reference, "main");
        assert_eq!(addr.key, "");
    }

    #[test]
    fn split_rejects_missing_ref() {
        assert!(matches!(Address::split("repo"), Err(FsError::Address { .. })));
        assert!(matches!(Address::split(""), Err(FsError::Address { .. })));
        assert!(Address::split("repo/main").is_ok());
    }

    #[test]
    fn strip_removes_exactly_one_slash() {
        assert_eq!(strip_trailing_slash("a/b/"), "a/b");
        assert_eq!(strip_trailing_slash("a/b//"), "a/b/");
        assert_eq!(strip_trailing_slash("a"), "a");
    }

    #[test]
    fn parent_walks_up_one_level() {
        assert_eq!(parent("repo/main/data/x"), "repo/main/data");
        assert_eq!(parent("repo"), "");
        assert_eq!(parent(""), "");
    }

    #[test]
    fn normalize_strips_scheme_and_slashes() {
        assert_eq!(normalize("lakefs://repo/main/data/"), "repo/main/data");
        assert_eq!(normalize("/repo/main"), "repo/main");
        assert_eq!(normalize("repo/main"), "repo/main");
    }

    proptest! {
        // Round-trip: split then re-join reproduces the original path for
        // any well-formed repo/ref/key input.
        #[test]
        fn split_join_round_trips(
            repo in "[a-z0-9-]{1,12}",
            reference in "[a-z0-9-]{1,12}",
            key in "[a-zA-Z0-9._/-]{0,40}",
        ) {
            let path = format!("{repo}/{reference}/{key}");
            let addr = Address::split(&path).unwrap();
            prop_assert_eq!(addr.repository.as_str(), repo.as_str());
            prop_assert_eq!(addr.reference.as_str(), reference.as_str());
            prop_assert_eq!(addr.key.as_str(), key.as_str());
            prop_assert_eq!(addr.join(), path);
        }
    }
}
