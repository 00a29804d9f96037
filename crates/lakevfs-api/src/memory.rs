//! In-memory `ObjectStore` backend.
//!
//! Mirrors the server's listing semantics — delimiter grouping into
//! common prefixes, sorted pages, continuation cursors — so the
//! filesystem adapter can be exercised without a network. Also counts
//! listing and batch-delete round-trips, which the adapter's tests use
//! to pin down pagination and chunking behavior.

use crate::error::{Result, StoreError};
use crate::store::{DELETE_BATCH_MAX, ObjectStore};
use crate::types::{ObjectStats, ObjectStatsList, Pagination, RepositorySummary};
use async_trait::async_trait;
use md5::{Digest, Md5};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    mtime: i64,
    checksum: String,
}

#[derive(Debug, Default)]
struct State {
    repositories: HashMap<String, RepositorySummary>,
    /// (repository, ref, key) → object. BTreeMap keeps keys sorted, which
    /// is what gives listings their server-like ordering.
    objects: BTreeMap<(String, String, String), StoredObject>,
}

/// In-memory store with server-faithful listing behavior.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<State>,
    page_size: usize,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(1000)
    }

    /// Cap listing pages at `page_size` records, so tests can force
    /// multi-page listings with small data sets.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            state: RwLock::new(State::default()),
            page_size: page_size.max(1),
            list_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Register a repository so `get_repository` resolves it.
    pub async fn create_repository(&self, id: impl Into<String>, creation_date: i64) {
        let id = id.into();
        let mut state = self.state.write().await;
        state.repositories.insert(
            id.clone(),
            RepositorySummary {
                id,
                creation_date,
                default_branch: Some("main".to_string()),
            },
        );
    }

    /// Insert an object with an explicit mtime (epoch seconds).
    pub async fn put_object_with_mtime(
        &self,
        repository: &str,
        reference: &str,
        key: &str,
        data: &[u8],
        mtime: i64,
    ) {
        let mut state = self.state.write().await;
        state.objects.insert(
            (repository.to_string(), reference.to_string(), key.to_string()),
            StoredObject {
                checksum: md5_hex(data),
                data: data.to_vec(),
                mtime,
            },
        );
    }

    pub async fn contains(&self, repository: &str, reference: &str, key: &str) -> bool {
        let state = self.state.read().await;
        state.objects.contains_key(&(
            repository.to_string(),
            reference.to_string(),
            key.to_string(),
        ))
    }

    pub async fn object_count(&self) -> usize {
        self.state.read().await.objects.len()
    }

    /// Number of `list_objects` round-trips issued so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `delete_objects` round-trips issued so far.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn now_epoch() -> i64 {
    chrono::Utc::now().timestamp()
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_objects(
        &self,
        repository: &str,
        reference: &str,
        prefix: &str,
        delimiter: &str,
        after: Option<&str>,
    ) -> Result<ObjectStatsList> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;

        // Merge objects and delimiter-grouped common prefixes, sorted by
        // path, exactly as the server would return them.
        let mut merged: BTreeMap<String, ObjectStats> = BTreeMap::new();
        for ((repo, reference_, key), obj) in &state.objects {
            if repo != repository || reference_ != reference || !key.starts_with(prefix) {
                continue;
            }
            let rest = &key[prefix.len()..];
            if !delimiter.is_empty()
                && let Some(idx) = rest.find(delimiter)
            {
                let dir = format!("{prefix}{}", &rest[..idx + delimiter.len()]);
                merged
                    .entry(dir.clone())
                    .or_insert_with(|| ObjectStats::common_prefix(dir));
                continue;
            }
            merged.insert(
                key.clone(),
                ObjectStats::object(key.clone(), obj.checksum.clone(), obj.data.len() as u64, obj.mtime),
            );
        }

        let remaining: Vec<ObjectStats> = match after {
            Some(after) => merged
                .into_values()
                .filter(|r| r.path.as_str() > after)
                .collect(),
            None => merged.into_values().collect(),
        };

        let has_more = remaining.len() > self.page_size;
        let results: Vec<ObjectStats> = remaining.into_iter().take(self.page_size).collect();
        let next_offset = if has_more {
            results.last().map(|r| r.path.clone()).unwrap_or_default()
        } else {
            String::new()
        };

        Ok(ObjectStatsList {
            results,
            pagination: Pagination { has_more, next_offset },
        })
    }

    async fn get_object(&self, repository: &str, reference: &str, key: &str) -> Result<Vec<u8>> {
        let state = self.state.read().await;
        state
            .objects
            .get(&(repository.to_string(), reference.to_string(), key.to_string()))
            .map(|obj| obj.data.clone())
            .ok_or_else(|| StoreError::NotFound(format!("{repository}/{reference}/{key}")))
    }

    async fn stat_object(
        &self,
        repository: &str,
        reference: &str,
        key: &str,
    ) -> Result<ObjectStats> {
        let state = self.state.read().await;
        state
            .objects
            .get(&(repository.to_string(), reference.to_string(), key.to_string()))
            .map(|obj| {
                ObjectStats::object(key, obj.checksum.clone(), obj.data.len() as u64, obj.mtime)
            })
            .ok_or_else(|| StoreError::NotFound(format!("{repository}/{reference}/{key}")))
    }

    async fn upload_object(
        &self,
        repository: &str,
        branch: &str,
        key: &str,
        content: &[u8],
    ) -> Result<()> {
        self.put_object_with_mtime(repository, branch, key, content, now_epoch())
            .await;
        Ok(())
    }

    async fn delete_object(&self, repository: &str, branch: &str, key: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .objects
            .remove(&(repository.to_string(), branch.to_string(), key.to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("{repository}/{branch}/{key}")))
    }

    async fn delete_objects(&self, repository: &str, branch: &str, keys: &[String]) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if keys.len() > DELETE_BATCH_MAX {
            return Err(StoreError::InvalidRequest(format!(
                "batch of {} keys exceeds the {DELETE_BATCH_MAX}-key limit",
                keys.len()
            )));
        }
        let mut state = self.state.write().await;
        for key in keys {
            // Missing keys are ignored, as the server does for batches.
            state
                .objects
                .remove(&(repository.to_string(), branch.to_string(), key.clone()));
        }
        Ok(())
    }

    async fn get_repository(&self, repository: &str) -> Result<RepositorySummary> {
        let state = self.state.read().await;
        state
            .repositories
            .get(repository)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(repository.to_string()))
    }
}
