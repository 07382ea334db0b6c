//! Git repository sources
//!
//! `git+<transport>://host/repo[@ref]` sources are fetched once into the
//! cache (see [`crate::cache::SourceCache`]) and resolved from there.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::resolved::detect_source_root;
use super::{ParsedUri, ResolvedSource, SourceHandler};
use crate::cache::SourceCache;
use crate::error::{Result, bundle as bundle_err, source as source_err};
use crate::git;

/// Resolves git sources through the shared source cache
#[derive(Debug, Clone)]
pub struct GitSourceHandler {
    cache: Arc<SourceCache>,
}

impl GitSourceHandler {
    pub fn new(cache: Arc<SourceCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl SourceHandler for GitSourceHandler {
    fn name(&self) -> &'static str {
        "git"
    }

    fn can_handle(&self, parsed: &ParsedUri) -> bool {
        parsed.is_git()
    }

    async fn resolve(&self, parsed: &ParsedUri, cache_dir: &Path) -> Result<ResolvedSource> {
        let url = git::remote_url(&parsed.scheme, &parsed.path)
            .ok_or_else(|| source_err::unsupported(parsed.to_string(), &parsed.scheme))?;

        let entry = self
            .cache
            .fetch(cache_dir, &url, parsed.git_ref.as_deref())
            .await?;

        let active_path = match &parsed.subpath {
            Some(subpath) => entry.join(subpath),
            None => entry.clone(),
        };
        if !tokio::fs::try_exists(&active_path).await.unwrap_or(false) {
            return Err(bundle_err::not_found(
                parsed.to_string(),
                active_path.display().to_string(),
            ));
        }

        let source_root = detect_source_root(&active_path, cache_dir);
        Ok(ResolvedSource::new(active_path, source_root))
    }
}
