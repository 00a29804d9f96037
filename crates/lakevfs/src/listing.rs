//! Paginated listing engine.
//!
//! Issues bounded listing calls against the store, follows the
//! server-driven continuation cursor, and materializes the full result.
//! Two guards keep a buggy server from hanging the caller: the cursor
//! must strictly advance between pages, and the total page count is
//! capped.

use crate::error::{FsError, Result};
use lakevfs_api::{ObjectStats, ObjectStore};
use tracing::{debug, warn};

/// Sanity ceiling on pages per listing. At the server's page sizes this
/// is far beyond any real directory; past it we assume a protocol bug.
const MAX_LIST_PAGES: usize = 10_000;

/// List every object and common prefix under `prefix`, delimited at one
/// path segment, fully materialized in server order.
///
/// Degenerate-result correction: when a prefix without a trailing
/// separator yields exactly one common-prefix record ending in `/`, the
/// caller named a directory (or a sibling prefix sharing its spelling)
/// without the separator. The listing is re-issued with the separator
/// appended and that result is returned instead, so `prefix` and
/// `prefix + "/"` always agree. A prefix already ending in `/` is
/// unambiguous and never retried.
pub async fn list_all(
    store: &dyn ObjectStore,
    repository: &str,
    reference: &str,
    prefix: &str,
) -> Result<Vec<ObjectStats>> {
    let records = list_pages(store, repository, reference, prefix).await?;

    if !prefix.ends_with('/')
        && let [record] = records.as_slice()
        && !record.is_object()
        && record.path.ends_with('/')
    {
        debug!(prefix, "single directory marker, retrying with trailing slash");
        return list_pages(store, repository, reference, &format!("{prefix}/")).await;
    }

    Ok(records)
}

async fn list_pages(
    store: &dyn ObjectStore,
    repository: &str,
    reference: &str,
    prefix: &str,
) -> Result<Vec<ObjectStats>> {
    let path = format!("{repository}/{reference}/{prefix}");
    let mut records = Vec::new();
    let mut after: Option<String> = None;

    for page_no in 0.. {
        if page_no >= MAX_LIST_PAGES {
            warn!(%path, pages = page_no, "listing exceeded the page cap");
            return Err(FsError::Protocol {
                path,
                reason: format!("more than {MAX_LIST_PAGES} pages"),
            });
        }

        let page = store
            .list_objects(repository, reference, prefix, "/", after.as_deref())
            .await
            .map_err(|e| FsError::store("list", &path, e))?;
        records.extend(page.results);

        if !page.pagination.has_more {
            break;
        }
        let next = page.pagination.next_offset;
        if next.is_empty() || Some(&next) == after.as_ref() {
            warn!(%path, cursor = %next, "pagination cursor failed to advance");
            return Err(FsError::Protocol {
                path,
                reason: format!("cursor {next:?} did not advance"),
            });
        }
        after = Some(next);
    }

    debug!(%path, records = records.len(), "listing complete");
    Ok(records)
}
