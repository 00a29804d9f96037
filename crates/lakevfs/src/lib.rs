//! Virtual filesystem over branch-aware object stores.
//!
//! lakevfs maps the store's three-segment address space —
//! `repository/ref/key` — onto a conventional hierarchical file-I/O
//! surface, so generic data tools can list, read, write, and delete
//! versioned objects without knowing the versioning model.
//!
//! # Layout
//!
//! - [`LakeFs`]: the operation surface (ls, open, rm, copies, stat,
//!   touch, pipe).
//! - [`LakeFile`]: one open handle — range reads, or spooled writes
//!   committed atomically on close.
//! - [`DirCache`] / [`MemoryDirCache`]: per-path listing memoization
//!   with ancestor-chain invalidation on every mutation.
//! - [`Registry`]: binds configured filesystems to URL schemes
//!   (`lakefs://…`).
//!
//! The store itself lives behind `lakevfs_api::ObjectStore`; tests run
//! against its in-memory backend, production against HTTP.
//!
//! ```no_run
//! # async fn demo() -> Result<(), lakevfs::FsError> {
//! use lakevfs::LakeFs;
//! use lakevfs_api::Credentials;
//!
//! let fs = LakeFs::new(Credentials {
//!     access_key_id: "AKIA...".into(),
//!     secret_access_key: "...".into(),
//!     endpoint_url: "lakefs.example.com".into(),
//! })?;
//! for entry in fs.ls("repo/main/data/").await? {
//!     println!("{} ({} bytes)", entry.key, entry.size);
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod entry;
mod error;
mod file;
mod fs;
mod listing;
mod path;
mod registry;

pub use cache::{DirCache, MemoryDirCache};
pub use entry::{DirEntry, EntryKind};
pub use error::{FsError, Result};
pub use file::LakeFile;
pub use fs::LakeFs;
pub use path::{Address, strip_trailing_slash};
pub use registry::Registry;
