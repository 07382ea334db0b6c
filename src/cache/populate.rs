//! Staged population of cache entries
//!
//! A fetch writes into a `.staging-*` directory inside the cache root and is
//! renamed into place only when complete, so a half-written entry is never
//! visible under its final name. Failed or abandoned fetches leave nothing
//! behind: the staging directory is a `TempDir` and removes itself on drop.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::paths::{ENTRY_META_FILE, STAGING_PREFIX};
use crate::error::{Result, cache as cache_err};

/// What was fetched into a cache entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Clone URL
    pub url: String,
    /// Requested ref, if any
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// Checked-out commit
    pub sha: String,
}

/// Read the metadata file of an entry, if present and valid
pub fn read_entry_meta(entry: &Path) -> Option<EntryMeta> {
    let content = fs::read_to_string(entry.join(ENTRY_META_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Populate `entry` by running `fill` against a fresh staging directory.
///
/// If another writer created `entry` first, the staged copy is discarded and
/// the existing entry is returned.
pub fn populate_entry<F>(cache_dir: &Path, entry: &Path, fill: F) -> Result<PathBuf>
where
    F: FnOnce(&Path) -> Result<EntryMeta>,
{
    fs::create_dir_all(cache_dir).map_err(|e| {
        cache_err::operation_failed(format!(
            "Failed to create cache directory {}: {e}",
            cache_dir.display()
        ))
    })?;

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(cache_dir)
        .map_err(|e| {
            cache_err::operation_failed(format!("Failed to create staging directory: {e}"))
        })?;

    let meta = fill(staging.path())?;
    let meta_json = serde_json::to_string_pretty(&meta)
        .map_err(|e| cache_err::operation_failed(format!("Failed to encode entry metadata: {e}")))?;
    fs::write(staging.path().join(ENTRY_META_FILE), meta_json).map_err(|e| {
        cache_err::operation_failed(format!("Failed to write entry metadata: {e}"))
    })?;

    match fs::rename(staging.path(), entry) {
        Ok(()) => {
            tracing::debug!(entry = %entry.display(), sha = %meta.sha, "cache entry committed");
            Ok(entry.to_path_buf())
        }
        Err(err) if entry.is_dir() => {
            tracing::debug!(entry = %entry.display(), error = %err, "cache entry already populated, discarding staged copy");
            Ok(entry.to_path_buf())
        }
        Err(err) => Err(cache_err::operation_failed(format!(
            "Failed to move staged fetch into {}: {err}",
            entry.display()
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::cache::paths::is_staging_name;
    use tempfile::TempDir;

    fn meta() -> EntryMeta {
        EntryMeta {
            url: "file:///origin".to_string(),
            git_ref: Some("main".to_string()),
            sha: "0123456789abcdef0123456789abcdef01234567".to_string(),
        }
    }

    fn staging_dirs(cache: &Path) -> usize {
        fs::read_dir(cache)
            .expect("read cache")
            .filter_map(std::result::Result::ok)
            .filter(|e| is_staging_name(&e.file_name().to_string_lossy()))
            .count()
    }

    #[test]
    fn test_populate_commits_entry() {
        let temp = TempDir::new().expect("tempdir");
        let cache = temp.path().join("cache");
        let entry = cache.join("org-repo-0123456789ab");

        let path = populate_entry(&cache, &entry, |staging| {
            fs::write(staging.join("bundle.yaml"), "bundle: {name: x}").expect("write");
            Ok(meta())
        })
        .expect("populate");

        assert_eq!(path, entry);
        assert!(entry.join("bundle.yaml").is_file());
        assert_eq!(read_entry_meta(&entry), Some(meta()));
        assert_eq!(staging_dirs(&cache), 0);
    }

    #[test]
    fn test_populate_failure_leaves_nothing() {
        let temp = TempDir::new().expect("tempdir");
        let cache = temp.path().join("cache");
        let entry = cache.join("org-repo-0123456789ab");

        let result = populate_entry(&cache, &entry, |staging| {
            fs::write(staging.join("partial"), "x").expect("write");
            Err(cache_err::operation_failed("network down"))
        });

        assert!(result.is_err());
        assert!(!entry.exists());
        assert_eq!(staging_dirs(&cache), 0);
    }

    #[test]
    fn test_populate_lost_race_uses_existing() {
        let temp = TempDir::new().expect("tempdir");
        let cache = temp.path().join("cache");
        let entry = cache.join("org-repo-0123456789ab");
        fs::create_dir_all(&entry).expect("mkdir");
        fs::write(entry.join("winner"), "first").expect("write");

        let path = populate_entry(&cache, &entry, |staging| {
            fs::write(staging.join("loser"), "second").expect("write");
            Ok(meta())
        })
        .expect("populate");

        assert_eq!(path, entry);
        assert!(entry.join("winner").is_file());
        assert!(!entry.join("loser").exists());
        assert_eq!(staging_dirs(&cache), 0);
    }
}
