//! The filesystem facade.
//!
//! `LakeFs` is the public operation surface: listing, open, delete,
//! local copies, stat-like queries, touch, and single-shot uploads. It
//! composes the path codec, the listing engine, the entry mapper, and
//! the directory cache; every operation is a sequence of store
//! round-trips awaited to completion before returning.

use crate::cache::{DirCache, MemoryDirCache};
use crate::entry::DirEntry;
use crate::error::{FsError, Result};
use crate::file::LakeFile;
use crate::listing::list_all;
use crate::path::{Address, parent, strip_trailing_slash};
use chrono::{DateTime, Utc};
use lakevfs_api::{Credentials, DELETE_BATCH_MAX, HttpStore, ObjectStore, StoreError};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Filesystem view over a branch-aware object store.
///
/// Paths are flat `repository/ref/key` strings. The facade holds the
/// store client and the shared directory cache; cloning is cheap and
/// clones share both.
#[derive(Clone)]
pub struct LakeFs {
    store: Arc<dyn ObjectStore>,
    cache: Arc<dyn DirCache>,
}

impl std::fmt::Debug for LakeFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LakeFs").finish_non_exhaustive()
    }
}

impl LakeFs {
    /// Connect to a lakeFS server with an explicit credential triple.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let store = HttpStore::new(credentials)
            .map_err(|e| FsError::store("connect", "", e))?;
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Build a facade over any store backend, with the default
    /// in-process cache.
    pub fn with_store(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_cache(store, Arc::new(MemoryDirCache::new()))
    }

    /// Build a facade with a caller-supplied cache implementation.
    pub fn with_cache(store: Arc<dyn ObjectStore>, cache: Arc<dyn DirCache>) -> Self {
        Self { store, cache }
    }

    /// List the directory at `path`, returning full entries.
    ///
    /// Results are memoized per path; any mutation under a path evicts
    /// the cached listings of all its ancestors.
    pub async fn ls(&self, path: &str) -> Result<Vec<DirEntry>> {
        let addr = Address::split(path)?;
        if let Some(entries) = self.cache.lookup(path).await {
            debug!(path, "listing served from cache");
            return Ok(entries);
        }
        let records =
            list_all(self.store.as_ref(), &addr.repository, &addr.reference, &addr.key).await?;
        let entries: Vec<DirEntry> = records
            .iter()
            .map(|r| DirEntry::from_stats(&addr.repository, &addr.reference, r))
            .collect();
        self.cache.store(path, entries.clone()).await;
        Ok(entries)
    }

    /// List bare keys: object keys as-is, directory keys with their
    /// trailing `/` kept so callers can tell the two apart.
    pub async fn ls_names(&self, path: &str) -> Result<Vec<String>> {
        let entries = self.ls(path).await?;
        Ok(entries
            .into_iter()
            .map(|e| {
                if e.is_dir() {
                    format!("{}/", e.key)
                } else {
                    e.key
                }
            })
            .collect())
    }

    /// Open a read-mode handle. The object's size is resolved lazily on
    /// first range request.
    pub fn open_read(&self, path: &str) -> Result<LakeFile> {
        let addr = Address::split(path)?;
        Ok(LakeFile::open_read(self.store.clone(), self.cache.clone(), addr))
    }

    /// Open a write-mode handle backed by a private spool. The object
    /// appears at the store only when the handle is closed.
    pub fn open_write(&self, path: &str) -> Result<LakeFile> {
        let addr = Address::split(path)?;
        LakeFile::open_write(self.store.clone(), self.cache.clone(), addr)
    }

    /// Delete a single object and evict its ancestors' cached listings.
    pub async fn rm(&self, path: &str) -> Result<()> {
        let addr = Address::split(path)?;
        self.store
            .delete_object(&addr.repository, &addr.reference, &addr.key)
            .await
            .map_err(|e| FsError::store("delete", path, e))?;
        self.cache.invalidate(Some(parent(path))).await;
        Ok(())
    }

    /// Delete a batch of paths within one (repository, ref) tree.
    ///
    /// With `recursive`, each path is expanded to every object under it,
    /// optionally bounded by `maxdepth` directory levels. Keys are
    /// deleted in chunks of at most [`DELETE_BATCH_MAX`] per store call.
    /// A failed chunk aborts the batch; earlier chunks stay deleted.
    pub async fn rm_batch(
        &self,
        paths: &[String],
        recursive: bool,
        maxdepth: Option<usize>,
    ) -> Result<()> {
        let Some(first_path) = paths.first() else {
            return Ok(());
        };
        let first = Address::split(first_path)?;

        let mut keys: Vec<String> = Vec::new();
        for path in paths {
            let addr = Address::split(path)?;
            if !addr.same_tree(&first) {
                return Err(FsError::Address {
                    path: path.clone(),
                    reason: "batch spans more than one repository/ref tree".to_string(),
                });
            }
            if recursive {
                self.expand_keys(&addr, maxdepth, &mut keys).await?;
            } else {
                keys.push(addr.key.clone());
            }
        }

        for chunk in keys.chunks(DELETE_BATCH_MAX) {
            self.store
                .delete_objects(&first.repository, &first.reference, chunk)
                .await
                .map_err(|e| FsError::store("delete batch", first_path, e))?;
        }
        self.cache.invalidate(Some(parent(first_path))).await;
        Ok(())
    }

    /// Expand an address to the keys of every object under it, walking
    /// common prefixes up to `maxdepth` levels deep.
    async fn expand_keys(
        &self,
        addr: &Address,
        maxdepth: Option<usize>,
        out: &mut Vec<String>,
    ) -> Result<()> {
        let mut pending = vec![(addr.key.clone(), 0usize)];
        while let Some((prefix, depth)) = pending.pop() {
            let records =
                list_all(self.store.as_ref(), &addr.repository, &addr.reference, &prefix).await?;
            for record in records {
                if record.is_object() {
                    out.push(record.path);
                } else if maxdepth.is_none_or(|limit| depth + 1 < limit) {
                    pending.push((record.path, depth + 1));
                }
            }
        }
        Ok(())
    }

    /// Copy a remote path to the local filesystem. Directories only
    /// materialize locally (including parents); no data moves for them.
    pub async fn copy_to_local(&self, remote: &str, local: &Path) -> Result<()> {
        if self.is_dir(remote).await? {
            tokio::fs::create_dir_all(local).await?;
            return Ok(());
        }
        let mut file = self.open_read(remote)?;
        let data = file.read_all().await?;
        if let Some(dir) = local.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(local, data).await?;
        Ok(())
    }

    /// Copy a local path to the store. A local directory becomes a
    /// remote directory marker; a file streams up as a single object.
    pub async fn copy_from_local(&self, local: &Path, remote: &str) -> Result<()> {
        let meta = tokio::fs::metadata(local).await?;
        if meta.is_dir() {
            self.mkdirs(remote).await?;
        } else {
            let addr = Address::split(remote)?;
            let data = tokio::fs::read(local).await?;
            self.store
                .upload_object(&addr.repository, &addr.reference, &addr.key, &data)
                .await
                .map_err(|e| FsError::store("upload", remote, e))?;
        }
        self.cache.invalidate(Some(parent(remote))).await;
        Ok(())
    }

    /// Creation timestamp of a repository. Only a bare repository path
    /// has one; refs and keys reject with `NotSupported`.
    pub async fn created(&self, path: &str) -> Result<DateTime<Utc>> {
        let addr = Address::parse(path);
        if !addr.key.is_empty() {
            return Err(FsError::NotSupported {
                op: "created",
                path: path.to_string(),
                reason: "objects have no creation timestamp",
            });
        }
        if !addr.reference.is_empty() {
            return Err(FsError::NotSupported {
                op: "created",
                path: path.to_string(),
                reason: "refs have no creation timestamp",
            });
        }
        if addr.repository.is_empty() {
            return Err(FsError::Address {
                path: path.to_string(),
                reason: "expected a repository name".to_string(),
            });
        }
        let repo = self
            .store
            .get_repository(&addr.repository)
            .await
            .map_err(|e| FsError::store("created", path, e))?;
        DateTime::from_timestamp(repo.creation_date, 0).ok_or_else(|| {
            FsError::store(
                "created",
                path,
                StoreError::InvalidRequest(format!(
                    "creation date {} out of range",
                    repo.creation_date
                )),
            )
        })
    }

    /// Modification timestamp, or `None` when the path has none
    /// (directories, markers without an mtime).
    pub async fn modified(&self, path: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.info(path).await?.modified)
    }

    /// Resolve a path to a single entry. Objects stat directly; keys
    /// that only exist as common prefixes resolve to directory entries
    /// via a listing probe.
    pub async fn info(&self, path: &str) -> Result<DirEntry> {
        let addr = Address::split(path)?;
        if addr.key.is_empty() {
            // The root of a ref is always a directory.
            return Ok(DirEntry::directory(strip_trailing_slash(&addr.join())));
        }
        match self
            .store
            .stat_object(&addr.repository, &addr.reference, &addr.key)
            .await
        {
            Ok(stats) if stats.is_object() => {
                Ok(DirEntry::from_stats(&addr.repository, &addr.reference, &stats))
            }
            Ok(_) => Ok(DirEntry::directory(strip_trailing_slash(&addr.join()))),
            Err(e) if e.is_not_found() => {
                let records =
                    list_all(self.store.as_ref(), &addr.repository, &addr.reference, &addr.key)
                        .await?;
                if records.is_empty() {
                    Err(FsError::store("stat", path, e))
                } else {
                    Ok(DirEntry::directory(strip_trailing_slash(&addr.join())))
                }
            }
            Err(e) => Err(FsError::store("stat", path, e)),
        }
    }

    /// Whether the path resolves to anything at all.
    pub async fn exists(&self, path: &str) -> bool {
        self.info(path).await.is_ok()
    }

    /// Whether the path resolves to an object (not a common prefix).
    /// Missing paths are `false`, not an error.
    pub async fn is_file(&self, path: &str) -> Result<bool> {
        let addr = Address::split(path)?;
        if addr.key.is_empty() {
            return Ok(false);
        }
        match self
            .store
            .stat_object(&addr.repository, &addr.reference, &addr.key)
            .await
        {
            Ok(stats) => Ok(stats.is_object()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(FsError::store("stat", path, e)),
        }
    }

    /// Whether the path resolves to a directory. Missing paths are
    /// `false`, not an error.
    pub async fn is_dir(&self, path: &str) -> Result<bool> {
        match self.info(path).await {
            Ok(entry) => Ok(entry.is_dir()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create the object at `path` as zero-length, or leave it alone:
    /// an existing object survives `touch` unless `truncate` is set.
    pub async fn touch(&self, path: &str, truncate: bool) -> Result<()> {
        if truncate || !self.exists(path).await {
            let file = self.open_write(path)?;
            // Commit invalidates the parent's cached listings.
            file.close().await?;
        }
        Ok(())
    }

    /// Single-shot upload of an in-memory byte sequence.
    pub async fn pipe(&self, path: &str, data: &[u8]) -> Result<()> {
        let addr = Address::split(path)?;
        self.store
            .upload_object(&addr.repository, &addr.reference, &addr.key, data)
            .await
            .map_err(|e| FsError::store("upload", path, e))?;
        self.cache.invalidate(Some(parent(path))).await;
        Ok(())
    }

    /// Ensure a remote directory marker exists at `path`.
    pub async fn mkdirs(&self, path: &str) -> Result<()> {
        let addr = Address::split(path)?;
        if addr.key.is_empty() {
            // Ref roots always exist.
            return Ok(());
        }
        let marker = format!("{}/", strip_trailing_slash(&addr.key));
        self.store
            .upload_object(&addr.repository, &addr.reference, &marker, &[])
            .await
            .map_err(|e| FsError::store("mkdir", path, e))?;
        self.cache.invalidate(Some(parent(path))).await;
        Ok(())
    }

    /// Drop cached listings: one path's ancestor chain, or everything.
    pub async fn invalidate_cache(&self, path: Option<&str>) {
        self.cache.invalidate(path).await;
    }
}
