//! Source cache for fetched git repositories
//!
//! ## Cache Structure
//!
//! ```text
//! <cache_dir>/
//! ├── <repo-slug>-<key-hash>/      one checkout per (url, ref)
//! │   ├── .bundlekit-entry.json    url, ref and commit of the checkout
//! │   └── <repository contents>
//! └── .staging-XXXXXX/             in-progress fetch, renamed into place
//! ```
//!
//! Entries are never refreshed: a `(url, ref)` pair is fetched once and reused
//! until the cache is cleared.

pub mod inflight;
pub mod paths;
pub mod populate;
pub mod stats;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

pub use inflight::{EntryGuard, InFlight};
pub use paths::{cache_key, entry_name, entry_path};
pub use populate::{EntryMeta, populate_entry, read_entry_meta};
pub use stats::{CacheStats, CachedEntry, cache_stats, clear_cache, list_entries, remove_entry};

use crate::error::{Result, cache as cache_err};
use crate::git;

/// Fetches git sources into a cache directory, at most once per key
#[derive(Debug, Default)]
pub struct SourceCache {
    in_flight: InFlight,
    fetches: AtomicUsize,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fetches this cache has performed (hits excluded)
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Return the cache entry for `url` at `git_ref`, fetching it if absent.
    ///
    /// Concurrent calls for the same entry wait for the first one and then
    /// reuse its result.
    pub async fn fetch(&self, cache_dir: &Path, url: &str, git_ref: Option<&str>) -> Result<PathBuf> {
        tokio::fs::create_dir_all(cache_dir).await.map_err(|e| {
            cache_err::operation_failed(format!(
                "Failed to create cache directory {}: {e}",
                cache_dir.display()
            ))
        })?;
        let cache_dir = dunce::canonicalize(cache_dir)?;
        let entry = entry_path(&cache_dir, url, git_ref);

        let held = self.in_flight.acquire(&entry).await;
        if entry.is_dir() {
            tracing::debug!(url, ?git_ref, entry = %entry.display(), "cache hit");
            return Ok(entry);
        }

        tracing::info!(url, ?git_ref, "fetching source");
        self.fetches.fetch_add(1, Ordering::SeqCst);
        fetch_blocking(cache_dir, entry, url, git_ref, held).await
    }
}

/// Clone on a blocking thread. The entry lock moves with the work, so it stays
/// held until the clone ends even if the awaiting caller is dropped.
async fn fetch_blocking(
    cache_dir: PathBuf,
    entry: PathBuf,
    url: &str,
    git_ref: Option<&str>,
    held: EntryGuard,
) -> Result<PathBuf> {
    let url = url.to_string();
    let git_ref = git_ref.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        let _held = held;
        populate_entry(&cache_dir, &entry, |staging| {
            let sha = git::fetch_checkout(&url, git_ref.as_deref(), staging)?;
            Ok(EntryMeta { url, git_ref, sha })
        })
    })
    .await
    .map_err(|e| cache_err::operation_failed(format!("Fetch task failed: {e}")))?
}
