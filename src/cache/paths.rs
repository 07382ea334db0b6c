//! Cache entry naming
//!
//! Each fetched `(url, ref)` pair gets one directory directly below the cache
//! root, named `<repo-slug>-<key-hash>`:
//! - repo slug: the last two path segments of the URL, made path-safe
//!   (`https://github.com/org/repo.git` -> `org-repo`)
//! - key hash: first 12 hex characters of the BLAKE3 digest of `url@ref`

use std::path::{Path, PathBuf};

use crate::path_utils::make_path_safe;

/// Prefix of in-progress staging directories
pub const STAGING_PREFIX: &str = ".staging-";

/// Metadata file written into each cache entry
pub const ENTRY_META_FILE: &str = ".bundlekit-entry.json";

/// Ref used in cache keys when none is given
const DEFAULT_REF: &str = "HEAD";

const KEY_HASH_LEN: usize = 12;

/// Normalize a clone URL for keying: lowercase scheme and host, no trailing
/// slash or `.git`
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    match trimmed.split_once("://") {
        Some((scheme, rest)) => {
            let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
            if path.is_empty() {
                format!("{}://{}", scheme.to_lowercase(), host.to_lowercase())
            } else {
                format!("{}://{}/{path}", scheme.to_lowercase(), host.to_lowercase())
            }
        }
        None => trimmed.to_string(),
    }
}

/// Cache key for a URL and optional ref
pub fn cache_key(url: &str, git_ref: Option<&str>) -> String {
    format!("{}@{}", normalize_url(url), git_ref.unwrap_or(DEFAULT_REF))
}

/// Path-safe slug from the last two URL path segments
pub fn repo_slug(url: &str) -> String {
    let normalized = normalize_url(url);
    let path = normalized
        .split_once("://")
        .map_or(normalized.as_str(), |(_, rest)| rest);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let tail = if segments.len() >= 2 {
        &segments[segments.len() - 2..]
    } else {
        &segments[..]
    };
    make_path_safe(&tail.join("/"))
}

/// Directory name of the cache entry for a URL and ref
pub fn entry_name(url: &str, git_ref: Option<&str>) -> String {
    let digest = blake3::hash(cache_key(url, git_ref).as_bytes());
    let hex = digest.to_hex();
    format!("{}-{}", repo_slug(url), &hex[..KEY_HASH_LEN])
}

/// Full path of the cache entry for a URL and ref
pub fn entry_path(cache_dir: &Path, url: &str, git_ref: Option<&str>) -> PathBuf {
    cache_dir.join(entry_name(url, git_ref))
}

/// Whether a directory name belongs to an in-progress fetch
pub fn is_staging_name(name: &str) -> bool {
    name.starts_with(STAGING_PREFIX)
}
