//! Resolution results

use std::path::{Path, PathBuf};

use crate::path_utils::canonical_or_normalized;

/// A source resolved to local paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// The directory or file selected, including any subdirectory
    pub active_path: PathBuf,
    /// Root of the repository or directory `active_path` was found in
    pub source_root: PathBuf,
}

impl ResolvedSource {
    /// Build a resolution, falling back to `active_path` as its own root when
    /// `source_root` does not contain it
    pub fn new(active_path: PathBuf, source_root: PathBuf) -> Self {
        if active_path.starts_with(&source_root) {
            Self {
                active_path,
                source_root,
            }
        } else {
            tracing::debug!(
                active = %active_path.display(),
                root = %source_root.display(),
                "source root does not contain active path, using active path"
            );
            let source_root = fallback_root(&active_path);
            Self {
                active_path,
                source_root,
            }
        }
    }

    /// Whether the load targeted something below the source root
    pub fn is_subpath(&self) -> bool {
        self.active_path != self.source_root
    }
}

/// Determine the source root for `active_path`.
///
/// Inside the cache directory the root is the cache entry that holds the path
/// (the first component below `cache_dir`), so a subdirectory of a cached
/// repository still reports the repository. Elsewhere the root is
/// `active_path` itself for a directory, or its parent for a file. Never fails.
pub fn detect_source_root(active_path: &Path, cache_dir: &Path) -> PathBuf {
    let cache_dir = canonical_or_normalized(cache_dir);
    if let Ok(relative) = active_path.strip_prefix(&cache_dir) {
        if let Some(first) = relative.components().next() {
            return cache_dir.join(first);
        }
    }
    fallback_root(active_path)
}

fn fallback_root(active_path: &Path) -> PathBuf {
    if active_path.is_file() {
        active_path
            .parent()
            .map_or_else(|| active_path.to_path_buf(), Path::to_path_buf)
    } else {
        active_path.to_path_buf()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn canonical(path: &Path) -> PathBuf {
        dunce::canonicalize(path).expect("canonicalize")
    }

    #[test]
    fn test_detect_root_inside_cache() {
        let temp = TempDir::new().expect("tempdir");
        let cache = canonical(temp.path()).join("cache");
        let nested = cache.join("org-repo-0123456789ab/behaviors/recipes");
        std::fs::create_dir_all(&nested).expect("mkdir");

        assert_eq!(
            detect_source_root(&nested, &cache),
            cache.join("org-repo-0123456789ab")
        );
    }

    #[test]
    fn test_detect_root_outside_cache_directory() {
        let temp = TempDir::new().expect("tempdir");
        let dir = canonical(temp.path()).join("local");
        std::fs::create_dir_all(&dir).expect("mkdir");

        assert_eq!(detect_source_root(&dir, &temp.path().join("cache")), dir);
    }

    #[test]
    fn test_detect_root_outside_cache_file() {
        let temp = TempDir::new().expect("tempdir");
        let dir = canonical(temp.path());
        let file = dir.join("bundle.yaml");
        std::fs::write(&file, "bundle: {name: x}").expect("write");

        assert_eq!(detect_source_root(&file, &dir.join("cache")), dir);
    }

    #[test]
    fn test_detect_root_tolerates_missing_cache() {
        let root = detect_source_root(Path::new("/nonexistent/x"), Path::new("/also/missing"));
        assert_eq!(root, PathBuf::from("/nonexistent/x"));
    }

    #[test]
    fn test_new_keeps_invariant() {
        let resolved = ResolvedSource::new(PathBuf::from("/a/b"), PathBuf::from("/c"));
        assert_eq!(resolved.source_root, PathBuf::from("/a/b"));
        assert!(!resolved.is_subpath());

        let resolved = ResolvedSource::new(PathBuf::from("/a/b"), PathBuf::from("/a"));
        assert!(resolved.is_subpath());
    }
}
