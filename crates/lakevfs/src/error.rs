//! Filesystem-layer error taxonomy.

use lakevfs_api::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FsError>;

/// Errors surfaced by the filesystem facade and file handles.
#[derive(Debug, Error)]
pub enum FsError {
    /// Malformed path — missing repository/ref segments, or a batch
    /// mixing (repository, ref) pairs.
    #[error("invalid path {path:?}: {reason}")]
    Address { path: String, reason: String },

    /// Operation invoked at the wrong path granularity.
    #[error("{op} is not supported for {path:?}: {reason}")]
    NotSupported {
        op: &'static str,
        path: String,
        reason: &'static str,
    },

    /// A store call failed. Carries the operation and path for context;
    /// the underlying client error is the source.
    #[error("{op} failed for {path:?}")]
    Store {
        op: &'static str,
        path: String,
        #[source]
        source: StoreError,
    },

    /// The store violated the pagination protocol — a cursor that never
    /// advances, or more pages than any sane listing produces.
    #[error("listing protocol violation for {path:?}: {reason}")]
    Protocol { path: String, reason: String },

    /// Local I/O failure (write spool, local copies).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FsError {
    pub(crate) fn store(op: &'static str, path: impl Into<String>, source: StoreError) -> Self {
        FsError::Store {
            op,
            path: path.into(),
            source,
        }
    }

    /// True when the root cause is a missing object — the cases the
    /// facade translates into `false`/empty results where the contract
    /// asks for them.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FsError::Store { source, .. } if source.is_not_found()
        )
    }
}
