//! Directory listing cache.
//!
//! Listings are memoized per normalized path. The one rule that keeps
//! the cache honest: any mutation under a path evicts the cached
//! listing of every ancestor directory up to the root, because a deep
//! mutation can change common-prefix membership at every level.

use crate::entry::DirEntry;
use crate::path::{normalize, parent};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::trace;

/// Keyed listing store. A trait so a different implementation (bounded,
/// shared, persistent) can be swapped in without touching the facade.
#[async_trait]
pub trait DirCache: Send + Sync {
    async fn lookup(&self, path: &str) -> Option<Vec<DirEntry>>;

    async fn store(&self, path: &str, entries: Vec<DirEntry>);

    /// Evict `path` and every ancestor up to the root. `None` clears
    /// the whole cache.
    async fn invalidate(&self, path: Option<&str>);
}

/// Default in-process cache: a locked map from normalized path to
/// listing.
#[derive(Debug, Default)]
pub struct MemoryDirCache {
    listings: RwLock<HashMap<String, Vec<DirEntry>>>,
}

impl MemoryDirCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DirCache for MemoryDirCache {
    async fn lookup(&self, path: &str) -> Option<Vec<DirEntry>> {
        let listings = self.listings.read().await;
        listings.get(normalize(path)).cloned()
    }

    async fn store(&self, path: &str, entries: Vec<DirEntry>) {
        let mut listings = self.listings.write().await;
        listings.insert(normalize(path).to_string(), entries);
    }

    async fn invalidate(&self, path: Option<&str>) {
        let mut listings = self.listings.write().await;
        let Some(path) = path else {
            listings.clear();
            return;
        };
        let mut current = normalize(path);
        loop {
            if listings.remove(current).is_some() {
                trace!(path = current, "evicted cached listing");
            }
            if current.is_empty() {
                break;
            }
            current = parent(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str) -> Vec<DirEntry> {
        vec![DirEntry::directory(name)]
    }

    #[tokio::test]
    async fn lookup_normalizes_keys() {
        let cache = MemoryDirCache::new();
        cache.store("repo/main/data", listing("d")).await;

        assert!(cache.lookup("lakefs://repo/main/data").await.is_some());
        assert!(cache.lookup("/repo/main/data/").await.is_some());
        assert!(cache.lookup("repo/main/other").await.is_none());
    }

    #[tokio::test]
    async fn invalidate_evicts_all_ancestors() {
        let cache = MemoryDirCache::new();
        cache.store("repo/main/data/sub", listing("s")).await;
        cache.store("repo/main/data", listing("d")).await;
        cache.store("repo/main", listing("m")).await;
        cache.store("repo", listing("r")).await;
        cache.store("other/main", listing("o")).await;

        cache.invalidate(Some("repo/main/data/sub/file.txt")).await;

        assert!(cache.lookup("repo/main/data/sub").await.is_none());
        assert!(cache.lookup("repo/main/data").await.is_none());
        assert!(cache.lookup("repo/main").await.is_none());
        assert!(cache.lookup("repo").await.is_none());
        // Unrelated trees stay cached.
        assert!(cache.lookup("other/main").await.is_some());
    }

    #[tokio::test]
    async fn invalidate_none_clears_everything() {
        let cache = MemoryDirCache::new();
        cache.store("repo/main", listing("m")).await;
        cache.store("other/main", listing("o")).await;

        cache.invalidate(None).await;

        assert!(cache.lookup("repo/main").await.is_none());
        assert!(cache.lookup("other/main").await.is_none());
    }
}
