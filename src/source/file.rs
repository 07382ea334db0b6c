//! Local path sources

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::resolved::detect_source_root;
use super::{ParsedUri, ResolvedSource, SourceHandler};
use crate::error::{Result, bundle as bundle_err};
use crate::path_utils::{canonical_or_normalized, is_within};

/// Resolves plain paths and `file://` URIs
#[derive(Debug, Clone)]
pub struct FileSourceHandler {
    base_path: PathBuf,
}

impl FileSourceHandler {
    /// Handler resolving `./` and `../` paths against `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Handler relative to the process working directory
    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    fn base_relative(&self, path: &str) -> PathBuf {
        let is_dot_relative = path == "."
            || path == ".."
            || path.starts_with("./")
            || path.starts_with("../")
            || path.starts_with(".\\")
            || path.starts_with("..\\");
        if is_dot_relative {
            self.base_path.join(path)
        } else {
            PathBuf::from(path)
        }
    }
}

#[async_trait]
impl SourceHandler for FileSourceHandler {
    fn name(&self) -> &'static str {
        "file"
    }

    fn can_handle(&self, parsed: &ParsedUri) -> bool {
        parsed.is_file()
    }

    async fn resolve(&self, parsed: &ParsedUri, cache_dir: &Path) -> Result<ResolvedSource> {
        let located = self.base_relative(&parsed.path);
        let located = if located.is_absolute() {
            located
        } else {
            std::env::current_dir()?.join(located)
        };
        let resolved_path = canonical_or_normalized(&located);

        let active_path = match &parsed.subpath {
            Some(subpath) => resolved_path.join(subpath),
            None => resolved_path.clone(),
        };
        if !tokio::fs::try_exists(&active_path).await.unwrap_or(false) {
            return Err(bundle_err::not_found(
                parsed.to_string(),
                active_path.display().to_string(),
            ));
        }
        let active_path = canonical_or_normalized(&active_path);

        let cache_root = canonical_or_normalized(cache_dir);
        let source_root = if parsed.subpath.is_some() && !is_within(&active_path, &cache_root) {
            // The fragment selected a directory inside `resolved_path`, which
            // is therefore the root the load was cut from.
            detect_source_root(&resolved_path, cache_dir)
        } else {
            detect_source_root(&active_path, cache_dir)
        };

        tracing::debug!(
            active = %active_path.display(),
            root = %source_root.display(),
            "resolved local source"
        );
        Ok(ResolvedSource::new(active_path, source_root))
    }
}
