//! Source handler capability and dispatch

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::{FileSourceHandler, GitSourceHandler, ParsedUri, ResolvedSource};
use crate::cache::SourceCache;
use crate::error::{Result, source as source_err};

/// Turns a parsed URI into local paths
#[async_trait]
pub trait SourceHandler: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this handler accepts the URI
    fn can_handle(&self, parsed: &ParsedUri) -> bool;

    /// Resolve the URI, using `cache_dir` for anything fetched
    async fn resolve(&self, parsed: &ParsedUri, cache_dir: &Path) -> Result<ResolvedSource>;
}

/// Ordered handler list; the first handler that claims a URI resolves it
#[derive(Clone, Default)]
pub struct SourceHandlers {
    handlers: Vec<Arc<dyn SourceHandler>>,
}

impl SourceHandlers {
    /// An empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// File handler relative to `base_path`, then the git handler
    pub fn with_defaults(base_path: PathBuf, cache: Arc<SourceCache>) -> Self {
        let mut handlers = Self::new();
        handlers.push(Arc::new(FileSourceHandler::new(base_path)));
        handlers.push(Arc::new(GitSourceHandler::new(cache)));
        handlers
    }

    /// Append a handler with the lowest priority
    pub fn push(&mut self, handler: Arc<dyn SourceHandler>) {
        self.handlers.push(handler);
    }

    /// Put a handler ahead of all existing ones
    pub fn push_front(&mut self, handler: Arc<dyn SourceHandler>) {
        self.handlers.insert(0, handler);
    }

    /// Number of handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are installed
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Resolve through the first claiming handler
    pub async fn resolve(&self, parsed: &ParsedUri, cache_dir: &Path) -> Result<ResolvedSource> {
        let handler = self
            .handlers
            .iter()
            .find(|h| h.can_handle(parsed))
            .ok_or_else(|| source_err::unsupported(parsed.to_string(), &parsed.scheme))?;

        tracing::debug!(handler = handler.name(), uri = %parsed, "resolving source");
        handler.resolve(parsed, cache_dir).await
    }
}

impl std::fmt::Debug for SourceHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|h| h.name()))
            .finish()
    }
}
