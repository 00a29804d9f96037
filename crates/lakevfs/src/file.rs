//! Randomly-accessible remote file handles.
//!
//! A handle is opened in one of two modes and never switches:
//!
//! - **Read**: range reads against a remote object. The object size is
//!   resolved lazily with a stat call on first use. Each range request
//!   pulls the full object and slices it locally — there is no
//!   server-side range fetch, so distinct ranges each pay a full
//!   transfer.
//! - **Write**: appended bytes accumulate in a private spool file on
//!   local disk (not in memory, so large files don't balloon the
//!   process). Closing the handle uploads the spool as one object and
//!   releases it. Nothing is visible at the store before close —
//!   visibility is atomic at commit.

use crate::cache::DirCache;
use crate::error::{FsError, Result};
use crate::path::{Address, parent};
use lakevfs_api::ObjectStore;
use std::sync::Arc;
use tempfile::{NamedTempFile, TempPath};
use tokio::io::AsyncWriteExt;
use tracing::debug;

struct Spool {
    file: tokio::fs::File,
    temp_path: TempPath,
    len: u64,
}

enum State {
    Read { size: Option<u64> },
    Write { spool: Spool },
}

/// An open file handle bound to one `repository/ref/key` address.
pub struct LakeFile {
    store: Arc<dyn ObjectStore>,
    cache: Arc<dyn DirCache>,
    address: Address,
    path: String,
    state: State,
}

impl LakeFile {
    pub(crate) fn open_read(
        store: Arc<dyn ObjectStore>,
        cache: Arc<dyn DirCache>,
        address: Address,
    ) -> Self {
        let path = address.join();
        Self {
            store,
            cache,
            address,
            path,
            state: State::Read { size: None },
        }
    }

    pub(crate) fn open_write(
        store: Arc<dyn ObjectStore>,
        cache: Arc<dyn DirCache>,
        address: Address,
    ) -> Result<Self> {
        let (file, temp_path) = NamedTempFile::new()?.into_parts();
        let path = address.join();
        Ok(Self {
            store,
            cache,
            address,
            path,
            state: State::Write {
                spool: Spool {
                    file: tokio::fs::File::from_std(file),
                    temp_path,
                    len: 0,
                },
            },
        })
    }

    /// The flat `repository/ref/key` path this handle addresses.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Total size in bytes: the remote object's size for read handles
    /// (fetched lazily, then memoized), the spooled byte count for
    /// write handles.
    pub async fn size(&mut self) -> Result<u64> {
        match &mut self.state {
            State::Write { spool } => Ok(spool.len),
            State::Read { size: Some(size) } => Ok(*size),
            State::Read { size } => {
                let stats = self
                    .store
                    .stat_object(
                        &self.address.repository,
                        &self.address.reference,
                        &self.address.key,
                    )
                    .await
                    .map_err(|e| FsError::store("stat", &self.path, e))?;
                let resolved = stats.size_bytes.unwrap_or(0);
                *size = Some(resolved);
                Ok(resolved)
            }
        }
    }

    /// Read the byte range `[start, end)`.
    ///
    /// The range is clamped to the object: a start at or past the end
    /// of the object yields an empty buffer, as does an empty clamped
    /// range. Never errors on out-of-bounds requests.
    pub async fn read_range(&mut self, start: u64, end: u64) -> Result<Vec<u8>> {
        if matches!(self.state, State::Write { .. }) {
            return Err(FsError::NotSupported {
                op: "read_range",
                path: self.path.clone(),
                reason: "handle is open for writing",
            });
        }
        let size = self.size().await?;
        if start >= size || start >= end.min(size) {
            return Ok(Vec::new());
        }

        let data = self.fetch().await?;
        // Clamp against the fetched bytes, not the stat size — the
        // object may have changed between the two round-trips.
        let start = start as usize;
        let end = (end as usize).min(data.len());
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(data[start..end].to_vec())
    }

    /// Read the whole object.
    pub async fn read_all(&mut self) -> Result<Vec<u8>> {
        if matches!(self.state, State::Write { .. }) {
            return Err(FsError::NotSupported {
                op: "read_all",
                path: self.path.clone(),
                reason: "handle is open for writing",
            });
        }
        self.fetch().await
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        self.store
            .get_object(
                &self.address.repository,
                &self.address.reference,
                &self.address.key,
            )
            .await
            .map_err(|e| FsError::store("read", &self.path, e))
    }

    /// Append bytes to the write spool.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.state {
            State::Write { spool } => {
                spool.file.write_all(data).await?;
                spool.len += data.len() as u64;
                Ok(())
            }
            State::Read { .. } => Err(FsError::NotSupported {
                op: "write_all",
                path: self.path.clone(),
                reason: "handle is open for reading",
            }),
        }
    }

    /// Close the handle. Read handles simply release; write handles
    /// flush the spool, commit its full contents as a single object
    /// upload, evict the parent's cached listings, then release the
    /// spool.
    pub async fn close(self) -> Result<()> {
        let State::Write { mut spool } = self.state else {
            return Ok(());
        };
        spool.file.flush().await?;
        drop(spool.file);

        let content = tokio::fs::read(&spool.temp_path).await?;
        self.store
            .upload_object(
                &self.address.repository,
                &self.address.reference,
                &self.address.key,
                &content,
            )
            .await
            .map_err(|e| FsError::store("upload", &self.path, e))?;
        debug!(path = %self.path, bytes = content.len(), "committed spooled write");

        self.cache.invalidate(Some(parent(&self.path))).await;
        // TempPath removes the spool file on drop.
        Ok(())
    }
}
