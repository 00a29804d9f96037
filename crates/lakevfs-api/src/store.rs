//! The `ObjectStore` trait — the seam between the filesystem adapter
//! and whatever actually holds the objects.

use crate::error::Result;
use crate::types::{ObjectStats, ObjectStatsList, RepositorySummary};
use async_trait::async_trait;

/// Hard ceiling on keys per [`ObjectStore::delete_objects`] call,
/// imposed by the server. Callers must chunk larger batches.
pub const DELETE_BATCH_MAX: usize = 1000;

/// A branch-aware object store addressed by (repository, ref, key).
///
/// All operations are sequential network round-trips from the caller's
/// point of view; implementations do no background work. Mutating calls
/// (`upload_object`, `delete_object`, `delete_objects`) take a branch
/// name rather than an arbitrary ref — commits are immutable.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one page of objects and common prefixes under `prefix`,
    /// grouped at `delimiter`. `after` is the continuation cursor from
    /// the previous page's pagination, or `None` for the first page.
    async fn list_objects(
        &self,
        repository: &str,
        reference: &str,
        prefix: &str,
        delimiter: &str,
        after: Option<&str>,
    ) -> Result<ObjectStatsList>;

    /// Fetch the full content of one object.
    async fn get_object(&self, repository: &str, reference: &str, key: &str) -> Result<Vec<u8>>;

    /// Stat a single key. Returns `StoreError::NotFound` when the key
    /// does not resolve to an object.
    async fn stat_object(&self, repository: &str, reference: &str, key: &str)
    -> Result<ObjectStats>;

    /// Upload `content` as a single object, replacing any existing one.
    async fn upload_object(
        &self,
        repository: &str,
        branch: &str,
        key: &str,
        content: &[u8],
    ) -> Result<()>;

    /// Delete a single object.
    async fn delete_object(&self, repository: &str, branch: &str, key: &str) -> Result<()>;

    /// Delete up to [`DELETE_BATCH_MAX`] objects in one call.
    async fn delete_objects(&self, repository: &str, branch: &str, keys: &[String]) -> Result<()>;

    /// Fetch repository metadata.
    async fn get_repository(&self, repository: &str) -> Result<RepositorySummary>;
}
