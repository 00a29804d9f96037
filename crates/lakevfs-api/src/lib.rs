//! Object-store client layer for lakevfs.
//!
//! The filesystem adapter in the `lakevfs` crate never talks to the wire
//! directly; everything goes through the [`ObjectStore`] trait defined
//! here. Two implementations ship with the crate:
//!
//! - **[`HttpStore`]**: talks to a real lakeFS server over its REST API
//!   with basic-auth credentials.
//! - **[`MemoryStore`]**: an in-process fake with the same listing,
//!   pagination, and delete semantics. Used by the test suites and for
//!   offline experimentation.

mod error;
mod http;
mod memory;
mod store;
mod types;

pub use error::{Result, StoreError};
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use store::{DELETE_BATCH_MAX, ObjectStore};
pub use types::{
    Credentials, ObjectStats, ObjectStatsList, Pagination, PathType, RepositorySummary,
};
